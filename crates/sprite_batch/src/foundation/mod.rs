//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for sprite geometry
//! - Handle types for the sprite arena
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
