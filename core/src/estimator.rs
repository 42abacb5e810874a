//! Monte Carlo estimation of π.
//!
//! Points are drawn uniformly from the square `[-1, 1) × [-1, 1)`; the share
//! of points falling inside the inscribed unit circle approaches `π / 4`.
//! Every sample is evaluated independently by the injected
//! [`ParallelMapReduce`] engine and the in-circle indicators are summed.

use crate::map_reduce::ParallelMapReduce;
use crate::traits::RddError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Number of samples drawn per partition.
pub const SAMPLES_PER_PARTITION: u64 = 1;

/// Errors raised while estimating π
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("Invalid argument: partitions must be at least 1, got {0}")]
    InvalidArgument(i64),

    #[error("Parallel execution failed: {0}")]
    Execution(#[from] RddError),
}

/// Result type for estimator operations
pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Returns 1 when `(x, y)` lies inside or on the unit circle, 0 otherwise.
pub fn indicator(x: f64, y: f64) -> u64 {
    if x * x + y * y <= 1.0 { 1 } else { 0 }
}

/// Draws one uniform point and tests it against the unit circle.
///
/// The index only enumerates the sample; it does not influence the draw.
pub fn per_sample_indicator(sample_index: u64) -> u64 {
    let (x, y) = UniformSampler.sample(sample_index);
    indicator(x, y)
}

/// Combines two partial in-circle counts.
pub fn reduce(a: u64, b: u64) -> u64 {
    a + b
}

/// Source of sample points in `[-1, 1) × [-1, 1)`.
pub trait PointSampler: Send + Sync + 'static {
    fn sample(&self, sample_index: u64) -> (f64, f64);
}

/// Draws from the calling worker's thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSampler;

impl PointSampler for UniformSampler {
    fn sample(&self, _sample_index: u64) -> (f64, f64) {
        let mut rng = rand::rng();
        (rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
    }
}

/// Derives every point from `(seed, sample_index)`, so a run is reproducible
/// regardless of how samples are chunked or which thread evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededSampler {
    seed: u64,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl PointSampler for SeededSampler {
    fn sample(&self, sample_index: u64) -> (f64, f64) {
        let mut rng =
            StdRng::seed_from_u64(self.seed ^ sample_index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        (rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
    }
}

/// Outcome of one estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PiEstimate {
    pub partitions: u64,
    pub samples: u64,
    /// Number of samples inside the unit circle
    pub inside: u64,
    pub value: f64,
}

impl PiEstimate {
    /// Derive the estimate `4 * inside / samples`.
    pub fn new(partitions: u64, samples: u64, inside: u64) -> Self {
        Self {
            partitions,
            samples,
            inside,
            value: 4.0 * inside as f64 / samples as f64,
        }
    }

    /// Absolute distance from π.
    pub fn error(&self) -> f64 {
        (self.value - std::f64::consts::PI).abs()
    }
}

/// Configurable π estimator.
#[derive(Debug, Clone)]
pub struct PiEstimator<S: PointSampler = UniformSampler> {
    sampler: Arc<S>,
}

impl PiEstimator<UniformSampler> {
    pub fn new() -> Self {
        Self::with_sampler(UniformSampler)
    }
}

impl Default for PiEstimator<UniformSampler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PointSampler> PiEstimator<S> {
    pub fn with_sampler(sampler: S) -> Self {
        Self {
            sampler: Arc::new(sampler),
        }
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Run one estimation with `partitions` parallel chunks.
    ///
    /// `partitions` below 1 is rejected before anything is sampled.
    pub fn run<E: ParallelMapReduce>(
        &self,
        engine: &E,
        partitions: i64,
    ) -> EstimatorResult<PiEstimate> {
        if partitions < 1 {
            return Err(EstimatorError::InvalidArgument(partitions));
        }
        let num_partitions =
            usize::try_from(partitions).map_err(|_| EstimatorError::InvalidArgument(partitions))?;
        let partitions = partitions as u64;
        let samples = SAMPLES_PER_PARTITION
            .checked_mul(partitions)
            .ok_or(EstimatorError::InvalidArgument(partitions as i64))?;

        let sampler = Arc::clone(&self.sampler);
        let inside = engine
            .map_reduce(
                1..=samples,
                num_partitions,
                move |sample_index| {
                    let (x, y) = sampler.sample(sample_index);
                    indicator(x, y)
                },
                reduce,
            )?
            .unwrap_or(0);

        let estimate = PiEstimate::new(partitions, samples, inside);
        debug!(
            "Estimated pi = {} from {}/{} samples in {} partitions",
            estimate.value, inside, samples, partitions
        );
        Ok(estimate)
    }
}

/// Estimate π with `partitions` chunks of uniformly drawn samples.
pub fn estimate_pi<E: ParallelMapReduce>(engine: &E, partitions: i64) -> EstimatorResult<f64> {
    PiEstimator::new()
        .run(engine, partitions)
        .map(|estimate| estimate.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_reduce::SequentialMapReduce;
    use crate::traits::{Data, RddResult};
    use std::ops::RangeInclusive;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Puts the first `inside` samples at (0.6, 0.6) and the rest at (0.9, 0.9).
    struct FixedSampler {
        inside: u64,
    }

    impl PointSampler for FixedSampler {
        fn sample(&self, sample_index: u64) -> (f64, f64) {
            if sample_index <= self.inside {
                (0.6, 0.6)
            } else {
                (0.9, 0.9)
            }
        }
    }

    #[derive(Default)]
    struct CountingEngine {
        calls: AtomicUsize,
    }

    impl ParallelMapReduce for CountingEngine {
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
            self.calls.fetch_add(1, Ordering::SeqCst);
            SequentialMapReduce.map_reduce(indices, num_partitions, map_fn, reduce_fn)
        }
    }

    struct FailingEngine;

    impl ParallelMapReduce for FailingEngine {
        fn map_reduce<T, M, R>(
            &self,
            _indices: RangeInclusive<u64>,
            _num_partitions: usize,
            _map_fn: M,
            _reduce_fn: R,
        ) -> RddResult<Option<T>>
        where
            T: Data,
            M: Fn(u64) -> T + Send + Sync + 'static,
            R: Fn(T, T) -> T + Send + Sync,
        {
            Err(RddError::ComputationError("executor lost".to_string()))
        }
    }

    #[test]
    fn test_indicator() {
        assert_eq!(indicator(0.6, 0.6), 1);
        assert_eq!(indicator(0.9, 0.9), 0);
        assert_eq!(indicator(0.0, 0.0), 1);
        assert_eq!(indicator(1.0, 0.0), 1);
        assert_eq!(indicator(-1.0, -0.1), 0);
    }

    #[test]
    fn test_per_sample_indicator_is_binary() {
        for index in 1..=1000 {
            assert!(per_sample_indicator(index) <= 1);
        }
    }

    #[test]
    fn test_reduce() {
        assert_eq!(reduce(3, 4), 7);
        assert_eq!(reduce(0, 0), 0);
    }

    #[test]
    fn test_uniform_sampler_range() {
        for index in 0..1000 {
            let (x, y) = UniformSampler.sample(index);
            assert!((-1.0..1.0).contains(&x));
            assert!((-1.0..1.0).contains(&y));
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let a = SeededSampler::new(42);
        let b = SeededSampler::new(42);
        let c = SeededSampler::new(43);
        assert_eq!(a.sample(7), b.sample(7));
        assert_ne!(a.sample(7), a.sample(8));
        assert_ne!(a.sample(7), c.sample(7));
    }

    #[test]
    fn test_fixed_sequence_estimate() {
        let estimator = PiEstimator::with_sampler(FixedSampler { inside: 7 });
        let estimate = estimator.run(&SequentialMapReduce, 10).unwrap();
        assert_eq!(estimate.samples, 10);
        assert_eq!(estimate.inside, 7);
        assert!((estimate.value - 2.8).abs() < 1e-12);
    }

    #[test]
    fn test_single_partition() {
        let estimator = PiEstimator::with_sampler(FixedSampler { inside: 1 });
        let estimate = estimator.run(&SequentialMapReduce, 1).unwrap();
        assert_eq!(estimate.partitions, 1);
        assert_eq!(estimate.samples, 1);
        assert_eq!(estimate.value, 4.0);

        let estimator = PiEstimator::with_sampler(FixedSampler { inside: 0 });
        let estimate = estimator.run(&SequentialMapReduce, 1).unwrap();
        assert_eq!(estimate.value, 0.0);
    }

    #[test]
    fn test_invalid_partitions_rejected_before_sampling() {
        let engine = CountingEngine::default();
        for partitions in [0, -1, -100, i64::MIN] {
            let result = estimate_pi(&engine, partitions);
            assert_eq!(result, Err(EstimatorError::InvalidArgument(partitions)));
        }
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);

        estimate_pi(&engine, 3).unwrap();
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_execution_failure_propagates() {
        let result = estimate_pi(&FailingEngine, 4);
        assert_eq!(
            result,
            Err(EstimatorError::Execution(RddError::ComputationError(
                "executor lost".to_string()
            )))
        );
    }

    #[test]
    fn test_estimate_error() {
        let estimate = PiEstimate::new(4, 4, 3);
        assert_eq!(estimate.value, 3.0);
        assert!((estimate.error() - (std::f64::consts::PI - 3.0)).abs() < 1e-12);
    }
}
