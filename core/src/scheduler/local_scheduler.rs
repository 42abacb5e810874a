//! Local Task Scheduler
//!
//! This module provides a local task scheduler that owns a Rayon thread pool
//! and executes one task per RDD partition on it.

use crate::traits::{Partition, RddError, RddResult};
use rayon::prelude::*;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Task represents a unit of work to be executed
pub struct Task<T> {
    pub partition: Box<dyn Partition>,
    pub compute_fn: ComputeFn<T>,
}

/// Type alias for complex compute function type
pub type ComputeFn<T> = Arc<dyn Fn(&dyn Partition) -> RddResult<Vec<T>> + Send + Sync>;

impl<T> Debug for Task<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("partition", &self.partition)
            .field("compute_fn", &"<function>")
            .finish()
    }
}

impl<T> Task<T> {
    pub fn new(partition: Box<dyn Partition>, compute_fn: ComputeFn<T>) -> Self {
        Self {
            partition,
            compute_fn,
        }
    }

    pub fn execute(&self) -> RddResult<Vec<T>> {
        (self.compute_fn)(self.partition.as_ref())
    }
}

/// LocalScheduler manages parallel execution of tasks using Rayon
pub struct LocalScheduler {
    /// Number of threads in the thread pool
    num_threads: usize,
    pool: rayon::ThreadPool,
}

impl Debug for LocalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalScheduler")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}

impl LocalScheduler {
    /// Create a new LocalScheduler with the specified number of threads.
    ///
    /// Zero threads falls back to the number of CPU cores.
    pub fn new(num_threads: usize) -> RddResult<Self> {
        let num_threads = if num_threads == 0 {
            num_cpus::get()
        } else {
            num_threads
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("sparkpi-worker-{i}"))
            .build()
            .map_err(|e| RddError::ContextError(format!("failed to build thread pool: {e}")))?;

        debug!("Created local scheduler with {} threads", num_threads);
        Ok(Self { num_threads, pool })
    }

    /// Create a new LocalScheduler with the default number of threads (CPU cores)
    pub fn with_default_threads() -> RddResult<Self> {
        Self::new(num_cpus::get())
    }

    /// Get the number of threads
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Execute a collection of tasks in parallel
    pub fn execute_tasks<T>(&self, tasks: Vec<Task<T>>) -> RddResult<Vec<Vec<T>>>
    where
        T: Send + Sync + Debug,
    {
        debug!("Executing {} tasks", tasks.len());
        self.pool
            .install(|| tasks.into_par_iter().map(|task| task.execute()).collect())
    }

    /// Execute a collection of tasks and collect all results into a single vector
    pub fn execute_and_collect<T>(&self, tasks: Vec<Task<T>>) -> RddResult<Vec<T>>
    where
        T: Send + Sync + Debug,
    {
        let partition_results = self.execute_tasks(tasks)?;
        Ok(partition_results.into_iter().flatten().collect())
    }

    /// Execute a collection of tasks and reduce the results using a fold operation.
    ///
    /// `fold_fn` folds the elements of one partition into a partial result,
    /// `reduce_fn` combines partial results in whatever order the pool
    /// finishes them, so it must be associative and commutative.
    pub fn execute_and_reduce<T, R, F, G>(
        &self,
        tasks: Vec<Task<T>>,
        identity: R,
        fold_fn: F,
        reduce_fn: G,
    ) -> RddResult<R>
    where
        T: Send + Sync + Debug,
        R: Send + Sync + Clone + Debug,
        F: Fn(R, T) -> R + Send + Sync,
        G: Fn(R, R) -> R + Send + Sync,
    {
        debug!("Reducing {} tasks", tasks.len());
        self.pool.install(|| {
            tasks
                .into_par_iter()
                .map(|task| -> RddResult<R> {
                    let partition_data = task.execute()?;
                    Ok(partition_data.into_iter().fold(identity.clone(), &fold_fn))
                })
                .reduce(
                    || Ok(identity.clone()),
                    |acc, item| match (acc, item) {
                        (Ok(a), Ok(b)) => Ok(reduce_fn(a, b)),
                        (Err(e), _) | (_, Err(e)) => Err(e),
                    },
                )
        })
    }

    /// Execute a collection of tasks and count the total number of elements
    pub fn execute_and_count<T>(&self, tasks: Vec<Task<T>>) -> RddResult<usize>
    where
        T: Send + Sync + Debug,
    {
        self.pool.install(|| {
            tasks
                .into_par_iter()
                .map(|task| -> RddResult<usize> { Ok(task.execute()?.len()) })
                .sum()
        })
    }
}
