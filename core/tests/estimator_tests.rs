//! Estimator integration tests
//!
//! Range properties, statistical convergence and chunking independence of
//! the Monte Carlo estimator on the parallel engine.

mod common;

use common::{create_test_context_with_threads, seven_of_ten_indicators, shared_context};
use proptest::prelude::*;
use sparkpi_core::estimator::{self, PiEstimate, PiEstimator, SeededSampler};
use sparkpi_core::{EstimatorError, ParallelMapReduce, SequentialMapReduce, estimate_pi};
use std::f64::consts::PI;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn estimate_stays_in_bounds(partitions in 1i64..2_000) {
        let estimate = PiEstimator::new().run(shared_context(), partitions).unwrap();
        prop_assert_eq!(estimate.partitions, partitions as u64);
        prop_assert_eq!(estimate.samples, partitions as u64);
        prop_assert!(estimate.inside <= estimate.samples);
        prop_assert!((0.0..=4.0).contains(&estimate.value));
    }

    #[test]
    fn non_positive_partitions_are_rejected(partitions in i64::MIN..=0) {
        let result = estimate_pi(&SequentialMapReduce, partitions);
        prop_assert_eq!(result, Err(EstimatorError::InvalidArgument(partitions)));
    }
}

#[test]
fn test_mean_estimate_converges_to_pi() {
    let context = shared_context();
    let runs = 30;
    let mut total = 0.0;
    for _ in 0..runs {
        let value = estimate_pi(context, 10_000).unwrap();
        assert!((0.0..=4.0).contains(&value));
        total += value;
    }
    let mean = total / runs as f64;
    assert!(
        (mean - PI).abs() < 0.1,
        "mean estimate {mean} too far from pi"
    );
}

#[test]
fn test_fixed_indicators_independent_of_chunking() {
    let indicators = seven_of_ten_indicators();
    let context = create_test_context_with_threads("chunking", 3);

    for partitions in 1..=10 {
        let seq = indicators.clone();
        let parallel = context
            .map_reduce(
                1..=10,
                partitions,
                move |i| seq[(i - 1) as usize],
                estimator::reduce,
            )
            .unwrap();

        let seq = indicators.clone();
        let sequential = SequentialMapReduce
            .map_reduce(
                1..=10,
                partitions,
                move |i| seq[(i - 1) as usize],
                estimator::reduce,
            )
            .unwrap();

        assert_eq!(parallel, Some(7));
        assert_eq!(sequential, Some(7));
    }

    let reversed: u64 = indicators.iter().rev().copied().fold(0, estimator::reduce);
    assert_eq!(reversed, 7);

    let estimate = PiEstimate::new(10, 10, 7);
    assert!((estimate.value - 2.8).abs() < 1e-12);
}

#[test]
fn test_seeded_runs_ignore_thread_count() {
    let estimator = PiEstimator::with_sampler(SeededSampler::new(2024));

    let single = create_test_context_with_threads("seeded-1", 1);
    let many = create_test_context_with_threads("seeded-8", 8);

    let a = estimator.run(&single, 5_000).unwrap();
    let b = estimator.run(&many, 5_000).unwrap();
    let c = estimator.run(&SequentialMapReduce, 5_000).unwrap();

    assert_eq!(a, b);
    assert_eq!(a, c);
    assert!(a.error() < 0.2);
}
