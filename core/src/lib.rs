//! sparkpi core - Monte Carlo estimation of pi on a Spark-style local engine
//!
//! The engine splits work into partitions, runs one task per partition on a
//! Rayon thread pool and reduces the partial results. The estimator receives
//! the engine through the [`ParallelMapReduce`] capability.

pub mod conf;
pub mod context;
pub mod estimator;
pub mod map_reduce;
pub mod rdd;
pub mod scheduler;
pub mod traits;
pub mod workflow;

pub use conf::ClusterConf;
pub use context::FlowContext;
pub use estimator::{
    EstimatorError, PiEstimate, PiEstimator, SeededSampler, UniformSampler, estimate_pi,
};
pub use map_reduce::{ParallelMapReduce, SequentialMapReduce};
pub use rdd::SimpleRdd;
pub use scheduler::LocalScheduler;
pub use traits::{RddError, RddResult};
pub use workflow::{PiWorkflow, WorkflowError};
