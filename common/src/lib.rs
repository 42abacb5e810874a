//! Common utilities and abstractions for the sparkpi project.
//!
//! This crate provides the shared error type and configuration value parsing.

pub mod error;
pub mod units;

pub use error::{CommonError, Result};
pub use units::parse_memory_mb;
