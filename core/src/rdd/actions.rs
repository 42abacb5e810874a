//! RDD Actions
//!
//! Actions trigger computation and return results to the driver program.
//! Every action turns the RDD into one task per partition and hands the
//! tasks to a `LocalScheduler`.

use crate::rdd::SimpleRdd;
use crate::scheduler::{ComputeFn, LocalScheduler, Task};
use crate::traits::{Data, Partition, RddResult};
use std::sync::Arc;

impl<T: Data> SimpleRdd<T> {
    /// Build one task per partition of this RDD
    pub fn tasks(&self) -> Vec<Task<T>> {
        let rdd = self.clone();
        let compute_fn: ComputeFn<T> =
            Arc::new(move |partition: &dyn Partition| rdd.compute(partition));

        self.partitions()
            .into_iter()
            .map(|partition| Task::new(partition, Arc::clone(&compute_fn)))
            .collect()
    }

    /// Collect all elements of the RDD into a vector, in partition order
    pub fn collect(&self, scheduler: &LocalScheduler) -> RddResult<Vec<T>> {
        scheduler.execute_and_collect(self.tasks())
    }

    /// Count the number of elements in the RDD
    pub fn count(&self, scheduler: &LocalScheduler) -> RddResult<usize> {
        scheduler.execute_and_count(self.tasks())
    }

    /// Reduce the elements of the RDD using the specified associative and
    /// commutative function. Returns `None` for an empty RDD.
    pub fn reduce<F>(&self, scheduler: &LocalScheduler, f: F) -> RddResult<Option<T>>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        scheduler.execute_and_reduce(
            self.tasks(),
            None,
            |acc: Option<T>, item: T| match acc {
                Some(a) => Some(f(a, item)),
                None => Some(item),
            },
            |left: Option<T>, right: Option<T>| match (left, right) {
                (Some(a), Some(b)) => Some(f(a, b)),
                (a, None) => a,
                (None, b) => b,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> LocalScheduler {
        LocalScheduler::new(4).unwrap()
    }

    #[test]
    fn test_collect_keeps_partition_order() {
        let data: Vec<i32> = (1..=10).collect();
        let rdd = SimpleRdd::from_vec_with_partitions(data.clone(), 4);
        assert_eq!(rdd.collect(&scheduler()).unwrap(), data);
    }

    #[test]
    fn test_count() {
        let rdd = SimpleRdd::range(1..=25, 7);
        assert_eq!(rdd.count(&scheduler()).unwrap(), 25);
    }

    #[test]
    fn test_reduce() {
        let rdd = SimpleRdd::from_vec_with_partitions(vec![1, 2, 3, 4, 5], 3);
        let sum = rdd.reduce(&scheduler(), |a, b| a + b).unwrap();
        assert_eq!(sum, Some(15));
    }

    #[test]
    fn test_reduce_with_empty_partitions() {
        // more partitions than elements leaves some partitions empty
        let rdd = SimpleRdd::from_vec_with_partitions(vec![4, 5], 6);
        let sum = rdd.reduce(&scheduler(), |a, b| a + b).unwrap();
        assert_eq!(sum, Some(9));
    }

    #[test]
    fn test_reduce_empty() {
        let rdd: SimpleRdd<i32> = SimpleRdd::from_vec_with_partitions(vec![], 1);
        let result = rdd.reduce(&scheduler(), |a, b| a + b).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_map_then_reduce() {
        let rdd = SimpleRdd::range(1..=100, 8).map(|i| i * 2);
        let sum = rdd.reduce(&scheduler(), |a, b| a + b).unwrap();
        assert_eq!(sum, Some(10100));
    }

    #[test]
    fn test_tasks_one_per_partition() {
        let rdd = SimpleRdd::range(1..=9, 3);
        let tasks = rdd.tasks();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[1].execute().unwrap(), vec![4, 5, 6]);
    }
}
