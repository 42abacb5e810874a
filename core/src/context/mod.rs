//! Context module for sparkpi
//!
//! This module provides execution contexts for RDD operations.

pub mod flow_context;

pub use flow_context::*;
