//! FlowContext - Local execution context for RDD operations
//!
//! This module provides a non-distributed context that runs RDD actions on
//! its own Rayon thread pool.

use crate::conf::ClusterConf;
use crate::map_reduce::ParallelMapReduce;
use crate::rdd::SimpleRdd;
use crate::scheduler::LocalScheduler;
use crate::traits::{Data, RddResult};
use std::ops::RangeInclusive;
use tracing::info;

/// FlowContext manages RDD operations on a local thread pool
#[derive(Debug)]
pub struct FlowContext {
    app_name: String,
    scheduler: LocalScheduler,
}

impl FlowContext {
    /// Create a new FlowContext with the given application name, using one
    /// thread per CPU core.
    pub fn new(app_name: impl Into<String>) -> RddResult<Self> {
        Self::new_with_threads(app_name, 0)
    }

    /// Create a new FlowContext with a specific number of worker threads
    pub fn new_with_threads(app_name: impl Into<String>, num_threads: usize) -> RddResult<Self> {
        let app_name = app_name.into();
        let scheduler = LocalScheduler::new(num_threads)?;
        info!(
            "Started context '{}' with {} worker threads",
            app_name,
            scheduler.num_threads()
        );
        Ok(Self {
            app_name,
            scheduler,
        })
    }

    /// Create a FlowContext sized after a cluster configuration: one worker
    /// thread per executor core.
    pub fn from_conf(app_name: impl Into<String>, conf: &ClusterConf) -> RddResult<Self> {
        Self::new_with_threads(app_name, conf.local_parallelism())
    }

    /// Get the application name
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.scheduler.num_threads()
    }

    /// Create an RDD from a vector of data
    pub fn parallelize<T: Data>(&self, data: Vec<T>) -> SimpleRdd<T> {
        SimpleRdd::from_vec_with_partitions(data, self.num_threads())
    }

    /// Create an RDD from a vector with specified number of partitions
    pub fn parallelize_with_partitions<T: Data>(
        &self,
        data: Vec<T>,
        num_partitions: usize,
    ) -> SimpleRdd<T> {
        SimpleRdd::from_vec_with_partitions(data, num_partitions)
    }

    /// Create an RDD over an inclusive range of indices
    pub fn range(&self, indices: RangeInclusive<u64>, num_partitions: usize) -> SimpleRdd<u64> {
        SimpleRdd::range(indices, num_partitions)
    }

    /// Run the RDD and collect its elements
    pub fn run<T: Data>(&self, rdd: SimpleRdd<T>) -> RddResult<Vec<T>> {
        rdd.collect(&self.scheduler)
    }

    /// Count the elements of the RDD
    pub fn count<T: Data>(&self, rdd: &SimpleRdd<T>) -> RddResult<usize> {
        rdd.count(&self.scheduler)
    }

    /// Reduce the elements of the RDD with an associative, commutative function
    pub fn reduce<T, F>(&self, rdd: &SimpleRdd<T>, f: F) -> RddResult<Option<T>>
    where
        T: Data,
        F: Fn(T, T) -> T + Send + Sync,
    {
        rdd.reduce(&self.scheduler, f)
    }
}

impl ParallelMapReduce for FlowContext {
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
        let rdd = self.range(indices, num_partitions).map(map_fn);
        self.reduce(&rdd, reduce_fn)
    }
}
