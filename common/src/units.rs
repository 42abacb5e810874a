//! Memory size parsing for Spark-style configuration values.
//!
//! Values such as `1000M`, `2g` or `512k` are accepted. A value without a
//! unit suffix is interpreted as MiB, matching how `spark.driver.memory` and
//! `spark.executor.memory` are read.

use crate::error::{CommonError, Result};

const KIB_PER_MIB: u64 = 1024;

/// Parse a memory size string and return it in MiB.
///
/// Sizes below one MiB (e.g. `512k`) are rounded up so that a non-zero
/// request never becomes zero.
pub fn parse_memory_mb(value: &str) -> Result<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommonError::configuration_error("memory size is empty"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let without_b = lower.strip_suffix('b').unwrap_or(&lower);
    let split_at = without_b
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(without_b.len());
    let (digits, unit) = without_b.split_at(split_at);

    let amount: u64 = digits.parse().map_err(|e| {
        CommonError::configuration_error_with_source(
            format!("invalid memory size '{value}'"),
            e,
        )
    })?;

    let mb = match unit {
        "k" => amount.div_ceil(KIB_PER_MIB),
        "" | "m" => amount,
        "g" => amount.checked_mul(1024).ok_or_else(|| overflow(value))?,
        "t" => amount
            .checked_mul(1024 * 1024)
            .ok_or_else(|| overflow(value))?,
        other => {
            return Err(CommonError::configuration_error(format!(
                "unknown memory unit '{other}' in '{value}'"
            )));
        }
    };

    Ok(mb)
}

fn overflow(value: &str) -> CommonError {
    CommonError::configuration_error(format!("memory size '{value}' is too large"))
}
