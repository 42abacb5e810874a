//! RDD (Resilient Distributed Dataset) implementations
//!
//! This module contains the core RDD type and its actions.

pub mod actions;
pub mod base;

pub use base::*;
