//! The parallel map-then-reduce capability.
//!
//! Computations such as the π estimator receive an engine implementing
//! [`ParallelMapReduce`] instead of reaching for a process-wide context, so
//! the same computation can run on the rayon-backed [`FlowContext`] or on the
//! single-threaded [`SequentialMapReduce`].
//!
//! [`FlowContext`]: crate::context::FlowContext

use crate::rdd::SimpleRdd;
use crate::traits::{Data, RddResult};
use std::ops::RangeInclusive;

/// Bulk "parallel map, then reduce" over a range of indices.
pub trait ParallelMapReduce {
    /// Split `indices` into `num_partitions` contiguous chunks, apply `map_fn`
    /// to every index and combine the mapped values with `reduce_fn`.
    ///
    /// `reduce_fn` must be associative and commutative: chunks may be
    /// evaluated and combined in any order. Returns `Ok(None)` when the range
    /// is empty.
    fn map_reduce<T, M, R>(
        &self,
        indices: RangeInclusive<u64>,
        num_partitions: usize,
        map_fn: M,
        reduce_fn: R,
    ) -> RddResult<Option<T>>
    where
        T: Data,
        M: Fn(u64) -> T + Send + Sync + 'static,
        R: Fn(T, T) -> T + Send + Sync;
}

/// Evaluates partitions one after another on the calling thread.
///
/// Chunking is identical to the parallel engine; only the execution order is
/// fixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialMapReduce;

impl ParallelMapReduce for SequentialMapReduce {
    fn map_reduce<T, M, R>(
        &self,
        indices: RangeInclusive<u64>,
        num_partitions: usize,
        map_fn: M,
        reduce_fn: R,
    ) -> RddResult<Option<T>>
    where
        T: Data,
        M: Fn(u64) -> T + Send + Sync + 'static,
        R: Fn(T, T) -> T + Send + Sync,
    {
        let rdd = SimpleRdd::range(indices, num_partitions).map(map_fn);

        let mut result: Option<T> = None;
        for partition in rdd.partitions() {
            for item in rdd.compute(partition.as_ref())? {
                result = Some(match result {
                    Some(acc) => reduce_fn(acc, item),
                    None => item,
                });
            }
        }

        Ok(result)
    }
}
