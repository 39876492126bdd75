// ⚙️ Aggregator configuration

use crate::db::{AccumulatorStore, DEFAULT_LATENCY};
use crate::error::{AggregatorError, Result};
use std::time::Duration;

/// Worker pool size used when none is configured
///
/// The pool mostly waits on store latency rather than CPU, so it is sized
/// well above the core count.
pub const DEFAULT_WORKERS: usize = 32;

/// Budget for one run (1000 records at 3ms each)
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(3_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Number of threads in the increment pool
    pub workers: usize,

    /// Latency of each store write; configures the store built by
    /// `build_store`, not the aggregator
    pub latency: Duration,

    /// Wall-clock budget for a full run
    pub deadline: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig {
            workers: DEFAULT_WORKERS,
            latency: DEFAULT_LATENCY,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

impl AggregatorConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Fresh, zeroed store with the configured write latency
    pub fn build_store(&self) -> AccumulatorStore {
        AccumulatorStore::new(self.latency)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(AggregatorError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.deadline.is_zero() {
            return Err(AggregatorError::InvalidConfig(
                "deadline must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
