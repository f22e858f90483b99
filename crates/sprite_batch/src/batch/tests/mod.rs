//! Scenario tests across the batch API

mod helpers;
mod randomized;
