//! Core configuration for sprite batches

pub mod config;

pub use config::{BatchConfig, ChildOrder, GrowthPolicy, DEFAULT_CAPACITY};
