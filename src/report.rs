// 📊 Aggregation report - what one run did and what it left in the store

use crate::db::CategoryTotals;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub workers: usize,

    /// Records handed to the run, duplicates included
    pub input_records: usize,

    pub unique_records: usize,
    pub duplicates_dropped: usize,
    pub increments_applied: usize,

    /// Store totals read after every increment was applied
    pub totals: CategoryTotals,
}

impl AggregationReport {
    pub fn summary(&self) -> String {
        format!(
            "{} records ({} unique, {} duplicates) in {} ms on {} workers | boss {} | developer {}",
            self.input_records,
            self.unique_records,
            self.duplicates_dropped,
            self.elapsed_ms,
            self.workers,
            self.totals.boss,
            self.totals.developer,
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize aggregation report")
    }
}
