//! Two-step estimation workflow.
//!
//! The estimation task runs on a local context sized by its
//! [`ClusterConf`]; its result is handed to a reporting task together with
//! the time the workflow was triggered. Steps run strictly one after the
//! other.

use crate::conf::ClusterConf;
use crate::context::FlowContext;
use crate::estimator::{EstimatorError, PiEstimator, PointSampler, UniformSampler};
use sparkpi_common::error::CommonError;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

/// Partition count used when the workflow is not told otherwise.
pub const DEFAULT_PARTITIONS: i64 = 1;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Estimator(#[from] EstimatorError),

    #[error(transparent)]
    Configuration(#[from] CommonError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Estimates π on a context built from the task's cluster configuration.
#[derive(Debug, Clone)]
pub struct EstimatePiTask<S: PointSampler = UniformSampler> {
    name: String,
    conf: ClusterConf,
    estimator: PiEstimator<S>,
}

impl EstimatePiTask<UniformSampler> {
    pub fn new(conf: ClusterConf) -> Self {
        Self::with_estimator(conf, PiEstimator::new())
    }
}

impl<S: PointSampler> EstimatePiTask<S> {
    pub fn with_estimator(conf: ClusterConf, estimator: PiEstimator<S>) -> Self {
        Self {
            name: "estimate-pi".to_string(),
            conf,
            estimator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conf(&self) -> &ClusterConf {
        &self.conf
    }

    pub fn run(&self, partitions: i64) -> WorkflowResult<f64> {
        info!("Starting estimation with partitions: {}", partitions);
        if partitions < 1 {
            return Err(EstimatorError::InvalidArgument(partitions).into());
        }
        self.conf.validate()?;

        let context =
            FlowContext::from_conf(self.name.as_str(), &self.conf).map_err(EstimatorError::from)?;
        let estimate = self.estimator.run(&context, partitions)?;

        info!(
            "Task '{}' finished: pi ~ {} ({} of {} samples inside)",
            self.name, estimate.value, estimate.inside, estimate.samples
        );
        Ok(estimate.value)
    }
}

/// Logs a value together with the time the workflow was triggered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportTask;

impl ReportTask {
    /// Log the value; always returns 1.
    pub fn log(&self, value: f64, triggered_at: OffsetDateTime) -> u32 {
        let at = triggered_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| triggered_at.to_string());
        info!("Printed value: {} @ {}", value, at);
        1
    }
}

/// Estimation followed by reporting.
#[derive(Debug, Clone)]
pub struct PiWorkflow<S: PointSampler = UniformSampler> {
    partitions: i64,
    estimate: EstimatePiTask<S>,
    report: ReportTask,
}

impl PiWorkflow<UniformSampler> {
    pub fn new(conf: ClusterConf) -> Self {
        Self::with_task(EstimatePiTask::new(conf))
    }
}

impl<S: PointSampler> PiWorkflow<S> {
    pub fn with_task(estimate: EstimatePiTask<S>) -> Self {
        Self {
            partitions: DEFAULT_PARTITIONS,
            estimate,
            report: ReportTask,
        }
    }

    pub fn with_partitions(mut self, partitions: i64) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn partitions(&self) -> i64 {
        self.partitions
    }

    /// Run the estimation, report its result and return it.
    pub fn run(&self, triggered_at: OffsetDateTime) -> WorkflowResult<f64> {
        let pi = self.estimate.run(self.partitions)?;
        self.report.log(pi, triggered_at);
        Ok(pi)
    }
}
