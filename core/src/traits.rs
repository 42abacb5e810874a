//! Core traits for the sparkpi execution engine
//!
//! This module defines the fundamental abstractions shared by RDDs, the
//! local scheduler and the map-reduce capability.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Error types for RDD operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RddError {
    #[error("Computation failed: {0}")]
    ComputationError(String),

    #[error("Invalid partition: {0}")]
    InvalidPartition(usize),

    #[error("Context error: {0}")]
    ContextError(String),
}

/// Result type for RDD operations
pub type RddResult<T> = Result<T, RddError>;

/// Partition represents a logical partition of data in an RDD
pub trait Partition: Send + Sync + Debug {
    /// Get the partition index
    fn index(&self) -> usize;
}

/// Basic partition implementation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicPartition {
    index: usize,
}

impl BasicPartition {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Partition for BasicPartition {
    fn index(&self) -> usize {
        self.index
    }
}

/// A data type that can be used in an RDD.
pub trait Data:
    Send + Sync + Clone + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
}
impl<T> Data for T where
    T: Send + Sync + Clone + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_partition() {
        let partition = BasicPartition::new(3);
        assert_eq!(partition.index(), 3);
    }

    #[test]
    fn test_rdd_error_display() {
        assert_eq!(
            RddError::InvalidPartition(7).to_string(),
            "Invalid partition: 7"
        );
        assert_eq!(
            RddError::ComputationError("worker lost".to_string()).to_string(),
            "Computation failed: worker lost"
        );
    }
}
