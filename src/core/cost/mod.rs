//! Durable usage accounting per billing period.
//!
//! Synthesized characters are accumulated into one JSON document per
//! calendar month (`{dir}/{YYYY-MM}.json`), overwritten wholesale on each
//! update. A missing or corrupt document resets that month to zero; the
//! corruption is logged, never fatal. Records survive restarts and are
//! never deleted by this module.
//!
//! Concurrent `record` calls within this process are serialized by a mutex
//! held across the read-modify-write. Writers in other processes remain
//! last-write-wins, so cross-process totals are approximate.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Errors that can occur while persisting usage.
#[derive(Debug, Error)]
pub enum CostError {
    /// I/O error reading or writing the period file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error for the period document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for usage-tracking operations.
pub type CostResult<T> = Result<T, CostError>;

/// Cumulative usage for one billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Billing period key, `YYYY-MM` in UTC.
    pub month: String,
    /// Characters synthesized this period. Monotonically non-decreasing
    /// within a period.
    pub characters: u64,
    /// `characters / 1_000_000 * price_per_million_chars`, rounded to four
    /// decimal places.
    pub estimated_cost: f64,
}

impl UsageRecord {
    fn empty(month: String) -> Self {
        Self {
            month,
            characters: 0,
            estimated_cost: 0.0,
        }
    }
}

/// Persists character usage and estimated cost per month.
pub struct CostTracker {
    output_dir: PathBuf,
    price_per_million_chars: f64,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl CostTracker {
    /// Creates a tracker writing period files under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, price_per_million_chars: f64) -> Self {
        Self {
            output_dir: output_dir.into(),
            price_per_million_chars,
            write_lock: Mutex::new(()),
        }
    }

    /// Adds `char_count` to the current period and returns the updated
    /// record.
    ///
    /// A zero count is a no-op that returns a zero-valued record without
    /// touching the filesystem.
    pub async fn record(&self, char_count: u64) -> CostResult<UsageRecord> {
        let month = month_key();
        if char_count == 0 {
            return Ok(UsageRecord::empty(month));
        }

        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{month}.json"));

        let mut record = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<UsageRecord>(&bytes) {
                Ok(existing) => existing,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse existing cost file; resetting");
                    UsageRecord::empty(month.clone())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => UsageRecord::empty(month.clone()),
            Err(e) => return Err(e.into()),
        };

        record.month = month.clone();
        record.characters += char_count;
        record.estimated_cost = round4(
            record.characters as f64 / 1_000_000.0 * self.price_per_million_chars,
        );

        fs::write(&path, serde_json::to_vec_pretty(&record)?).await?;
        info!(
            month = %month,
            characters = record.characters,
            estimated_cost = record.estimated_cost,
            path = %path.display(),
            "Updated usage"
        );

        Ok(record)
    }

    /// Reads the current period's record without modifying it. Missing or
    /// corrupt files read as zero.
    pub async fn current(&self) -> UsageRecord {
        let month = month_key();
        let path = self.output_dir.join(format!("{month}.json"));
        match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| UsageRecord::empty(month)),
            Err(_) => UsageRecord::empty(month),
        }
    }
}

/// Billing period key for the current UTC time, `YYYY-MM`.
fn month_key() -> String {
    Utc::now().format("%Y-%m").to_string()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
