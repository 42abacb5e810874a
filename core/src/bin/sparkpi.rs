//! Command-line entry point: runs the estimate-then-report workflow.
//!
//! ```bash
//! sparkpi --partitions 10000 --conf spark.executor.instances=4
//! ```

use anyhow::Context;
use clap::Parser;
use sparkpi_core::conf::ClusterConf;
use sparkpi_core::estimator::{PiEstimator, SeededSampler};
use sparkpi_core::workflow::{DEFAULT_PARTITIONS, EstimatePiTask, PiWorkflow};
use std::path::PathBuf;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sparkpi", about = "Estimate pi with a Monte Carlo map-reduce job")]
struct Args {
    /// Number of partitions; one sample is drawn per partition
    #[arg(short, long, default_value_t = DEFAULT_PARTITIONS, allow_negative_numbers = true)]
    partitions: i64,

    /// JSON file with `spark_conf` and `limits` sections
    #[arg(long)]
    conf_file: Option<PathBuf>,

    /// Configuration override in `key=value` form, may be repeated
    #[arg(long = "conf", value_parser = parse_key_val)]
    conf: Vec<(String, String)>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// RFC 3339 time the workflow was triggered at (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    triggered_at: Option<OffsetDateTime>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn parse_timestamp(s: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(s, &Rfc3339).map_err(|e| format!("invalid RFC 3339 timestamp '{s}': {e}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();

    let mut conf = match &args.conf_file {
        Some(path) => ClusterConf::load_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClusterConf::default(),
    };
    // the file alone may be inconsistent until the overrides are applied
    conf.apply_pairs(args.conf.iter().map(|(k, v)| (k, v)))?;
    info!("Cluster configuration: {:?}", conf);

    let triggered_at = args.triggered_at.unwrap_or_else(OffsetDateTime::now_utc);
    let pi = match args.seed {
        Some(seed) => {
            let estimator = PiEstimator::with_sampler(SeededSampler::new(seed));
            PiWorkflow::with_task(EstimatePiTask::with_estimator(conf, estimator))
                .with_partitions(args.partitions)
                .run(triggered_at)?
        }
        None => PiWorkflow::new(conf)
            .with_partitions(args.partitions)
            .run(triggered_at)?,
    };

    println!("{pi}");
    Ok(())
}
