//! Base RDD implementations
//!
//! `SimpleRdd` is a concrete, lazily evaluated RDD. Sources are either an
//! in-memory vector or a computed partition function; `map` wraps its parent
//! into a new computed partition function so that nothing is evaluated until
//! an action runs.

use crate::scheduler::ComputeFn;
use crate::traits::{BasicPartition, Data, Partition, RddError, RddResult};
use std::fmt::Debug;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// SimpleRdd is the concrete RDD implementation used by `FlowContext`.
#[derive(Clone)]
pub enum SimpleRdd<T: Data> {
    /// RDD backed by a vector of data
    Vec {
        data: Arc<Vec<T>>,
        num_partitions: usize,
    },
    /// RDD whose partitions are produced by a compute function
    Computed {
        num_partitions: usize,
        compute: ComputeFn<T>,
    },
}

impl<T: Data> Debug for SimpleRdd<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimpleRdd::Vec {
                data,
                num_partitions,
            } => f
                .debug_struct("SimpleRdd::Vec")
                .field("data_len", &data.len())
                .field("num_partitions", num_partitions)
                .finish(),
            SimpleRdd::Computed { num_partitions, .. } => f
                .debug_struct("SimpleRdd::Computed")
                .field("num_partitions", num_partitions)
                .field("compute", &"<compute_function>")
                .finish(),
        }
    }
}

/// Returns the `[start, end)` element positions held by partition `index`
/// when `len` elements are split into `num_partitions` slices.
///
/// Slices differ in size by at most one element and cover every position
/// exactly once.
pub fn slice_bounds(len: u64, num_partitions: usize, index: usize) -> (u64, u64) {
    let len = len as u128;
    let n = num_partitions as u128;
    let start = (index as u128 * len) / n;
    let end = ((index as u128 + 1) * len) / n;
    (start as u64, end as u64)
}

fn at_least_one(num_partitions: usize) -> usize {
    if num_partitions == 0 { 1 } else { num_partitions }
}

impl<T: Data> SimpleRdd<T> {
    /// Create a new RDD from a vector with specified number of partitions
    pub fn from_vec_with_partitions(data: Vec<T>, num_partitions: usize) -> Self {
        Self::Vec {
            data: Arc::new(data),
            num_partitions: at_least_one(num_partitions),
        }
    }

    /// Apply a map transformation to this RDD
    pub fn map<U, F>(self, f: F) -> SimpleRdd<U>
    where
        U: Data,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let num_partitions = self.num_partitions();
        let parent = self;
        SimpleRdd::Computed {
            num_partitions,
            compute: Arc::new(move |partition: &dyn Partition| -> RddResult<Vec<U>> {
                Ok(parent.compute(partition)?.into_iter().map(&f).collect())
            }),
        }
    }

    /// Compute the elements of this RDD for the given partition
    pub fn compute(&self, partition: &dyn Partition) -> RddResult<Vec<T>> {
        let partition_index = partition.index();
        if partition_index >= self.num_partitions() {
            return Err(RddError::InvalidPartition(partition_index));
        }

        match self {
            SimpleRdd::Vec {
                data,
                num_partitions,
            } => {
                let (start, end) =
                    slice_bounds(data.len() as u64, *num_partitions, partition_index);
                Ok(data[start as usize..end as usize].to_vec())
            }
            SimpleRdd::Computed { compute, .. } => compute(partition),
        }
    }

    /// Get the list of partitions for this RDD
    pub fn partitions(&self) -> Vec<Box<dyn Partition>> {
        (0..self.num_partitions())
            .map(|i| Box::new(BasicPartition::new(i)) as Box<dyn Partition>)
            .collect()
    }

    /// Get the number of partitions
    pub fn num_partitions(&self) -> usize {
        match self {
            SimpleRdd::Vec { num_partitions, .. } | SimpleRdd::Computed { num_partitions, .. } => {
                *num_partitions
            }
        }
    }
}

impl SimpleRdd<u64> {
    /// Create an RDD over an inclusive range of indices.
    ///
    /// The range is never materialized as a whole: each partition generates
    /// only its own contiguous slice when computed.
    pub fn range(indices: RangeInclusive<u64>, num_partitions: usize) -> Self {
        let first = *indices.start();
        let len = if indices.is_empty() {
            0
        } else {
            // saturates only for the full u64 domain
            (indices.end() - first).saturating_add(1)
        };
        let num_partitions = at_least_one(num_partitions);

        SimpleRdd::Computed {
            num_partitions,
            compute: Arc::new(move |partition: &dyn Partition| -> RddResult<Vec<u64>> {
                let (start, end) = slice_bounds(len, num_partitions, partition.index());
                Ok((start..end).map(|pos| first + pos).collect())
            }),
        }
    }
}
