//! Foundation module - small shared utilities
//!
//! - Math type aliases
//! - Logging setup

pub mod math;
pub mod logging;
