//! Cluster configuration for the estimation task.
//!
//! The configuration uses the familiar `spark.*` keys so that a task can be
//! described with the same settings a Spark cluster would receive. Locally
//! only the core counts influence execution (they size the worker pool); the
//! memory settings are validated and reported.

use serde::{Deserialize, Serialize};
use sparkpi_common::error::{CommonError, Result};
use sparkpi_common::units::parse_memory_mb;
use std::collections::BTreeMap;
use std::path::Path;

pub const DRIVER_MEMORY: &str = "spark.driver.memory";
pub const DRIVER_CORES: &str = "spark.driver.cores";
pub const EXECUTOR_MEMORY: &str = "spark.executor.memory";
pub const EXECUTOR_CORES: &str = "spark.executor.cores";
pub const EXECUTOR_INSTANCES: &str = "spark.executor.instances";
/// Memory limit of the task container.
pub const LIMITS_MEMORY: &str = "limits.mem";

/// Upper bound for any core or instance count, and for the number of local
/// worker threads derived from them.
pub const MAX_LOCAL_PARALLELISM: usize = 1024;

/// Resources requested for one estimation task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConf {
    pub driver_memory_mb: u64,
    pub driver_cores: u32,
    pub executor_memory_mb: u64,
    pub executor_cores: u32,
    pub executor_instances: u32,
    /// Upper bound for the driver memory, if any
    pub memory_limit_mb: Option<u64>,
}

impl Default for ClusterConf {
    fn default() -> Self {
        Self {
            driver_memory_mb: 1000,
            driver_cores: 1,
            executor_memory_mb: 1000,
            executor_cores: 1,
            executor_instances: 2,
            memory_limit_mb: Some(2000),
        }
    }
}

/// On-disk layout of a configuration file.
#[derive(Debug, Default, Deserialize)]
struct ConfFile {
    #[serde(default)]
    spark_conf: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    limits: Option<LimitsFile>,
}

#[derive(Debug, Default, Deserialize)]
struct LimitsFile {
    mem: Option<serde_json::Value>,
}

fn value_to_string(key: &str, value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(CommonError::configuration_error(format!(
            "value of '{key}' must be a string or a number, got {other}"
        ))),
    }
}

fn parse_count(key: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|e| {
        CommonError::configuration_error_with_source(
            format!("invalid value '{value}' for '{key}'"),
            e,
        )
    })
}

impl ClusterConf {
    /// Apply a single `key = value` setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            DRIVER_MEMORY => self.driver_memory_mb = parse_memory_mb(value)?,
            DRIVER_CORES => self.driver_cores = parse_count(key, value)?,
            EXECUTOR_MEMORY => self.executor_memory_mb = parse_memory_mb(value)?,
            EXECUTOR_CORES => self.executor_cores = parse_count(key, value)?,
            EXECUTOR_INSTANCES => self.executor_instances = parse_count(key, value)?,
            LIMITS_MEMORY => self.memory_limit_mb = Some(parse_memory_mb(value)?),
            other => {
                return Err(CommonError::configuration_error(format!(
                    "unknown configuration key '{other}'"
                )));
            }
        }
        Ok(())
    }

    /// Build a configuration from defaults overridden by `pairs`, then validate it.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut conf = Self::default();
        conf.apply_pairs(pairs)?;
        Ok(conf)
    }

    /// Override settings with `pairs`, then validate the result.
    pub fn apply_pairs<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.set_all(pairs)?;
        self.validate()
    }

    /// Override settings with `pairs` without validating the result.
    pub fn set_all<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            self.set(key.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Parse and validate a configuration from its JSON representation:
    /// `{"spark_conf": {"spark.executor.cores": "1", ...}, "limits": {"mem": "2000M"}}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let conf = Self::load_json_str(json)?;
        conf.validate()?;
        Ok(conf)
    }

    /// Read and validate a configuration file in the format accepted by
    /// [`ClusterConf::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let conf = Self::load_json_file(path)?;
        conf.validate()?;
        Ok(conf)
    }

    /// Parse a JSON configuration over the defaults without validating it,
    /// so that later overrides can still make it consistent.
    pub fn load_json_str(json: &str) -> Result<Self> {
        let file: ConfFile = serde_json::from_str(json).map_err(|e| {
            CommonError::deserialization_error_with_source("malformed configuration JSON", e)
        })?;

        let mut pairs = Vec::with_capacity(file.spark_conf.len() + 1);
        for (key, value) in &file.spark_conf {
            pairs.push((key.clone(), value_to_string(key, value)?));
        }
        if let Some(mem) = file.limits.and_then(|limits| limits.mem) {
            pairs.push((LIMITS_MEMORY.to_string(), value_to_string(LIMITS_MEMORY, &mem)?));
        }

        let mut conf = Self::default();
        conf.set_all(pairs)?;
        Ok(conf)
    }

    /// Read a configuration file without validating it.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CommonError::io_error_with_source(
                format!("failed to read configuration file {}", path.display()),
                e,
            )
        })?;
        Self::load_json_str(&json)
    }

    /// Check the settings for consistency.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            (DRIVER_CORES, self.driver_cores),
            (EXECUTOR_CORES, self.executor_cores),
            (EXECUTOR_INSTANCES, self.executor_instances),
        ];
        for (key, value) in counts {
            if value == 0 {
                return Err(CommonError::configuration_error(format!(
                    "'{key}' must be at least 1"
                )));
            }
            if value as usize > MAX_LOCAL_PARALLELISM {
                return Err(CommonError::configuration_error(format!(
                    "'{key}' must be at most {MAX_LOCAL_PARALLELISM}, got {value}"
                )));
            }
        }

        let executor_threads = self.executor_instances as u64 * self.executor_cores as u64;
        if executor_threads > MAX_LOCAL_PARALLELISM as u64 {
            return Err(CommonError::configuration_error(format!(
                "'{EXECUTOR_INSTANCES}' x '{EXECUTOR_CORES}' = {executor_threads} exceeds \
                 {MAX_LOCAL_PARALLELISM} worker threads"
            )));
        }

        if self.driver_memory_mb == 0 || self.executor_memory_mb == 0 {
            return Err(CommonError::configuration_error(
                "driver and executor memory must be non-zero",
            ));
        }

        if let Some(limit) = self.memory_limit_mb {
            if self.driver_memory_mb > limit {
                return Err(CommonError::configuration_error(format!(
                    "'{DRIVER_MEMORY}' ({}M) exceeds the task memory limit ({limit}M)",
                    self.driver_memory_mb
                )));
            }
        }

        Ok(())
    }

    /// Number of worker threads used to emulate the executors locally,
    /// capped at [`MAX_LOCAL_PARALLELISM`].
    pub fn local_parallelism(&self) -> usize {
        (self.executor_instances as usize)
            .saturating_mul(self.executor_cores as usize)
            .min(MAX_LOCAL_PARALLELISM)
    }
}
