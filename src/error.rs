// ⚠️ Error taxonomy - validation, store and aggregation failures

use crate::entities::Category;
use std::time::Duration;
use thiserror::Error as ThisError;

// ============================================================================
// STORE ERRORS
// ============================================================================

/// Failure of a single increment against an accumulator.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum StoreError {
    /// Adding the amount would overflow the fixed-point total.
    #[error("total for '{category}' would overflow")]
    Overflow { category: Category },

    /// The worker running the increment panicked.
    #[error("increment worker panicked: {0}")]
    WorkerPanicked(String),

    /// The backing store rejected the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// AGGREGATOR ERRORS
// ============================================================================

#[derive(Debug, ThisError)]
pub enum AggregatorError {
    /// The label is not one of the known categories.
    #[error("unknown category '{label}'")]
    InvalidCategory { label: String },

    /// The amount is not a parseable decimal.
    #[error("invalid amount '{raw}' for record '{identity}'")]
    InvalidAmount { identity: String, raw: String },

    /// An increment failed; increments already applied stay in the store.
    #[error("aggregation failed after {completed} increments")]
    AggregationFailed {
        completed: usize,
        #[source]
        source: StoreError,
    },

    /// The run did not confirm every increment before the deadline.
    #[error("deadline of {deadline:?} exceeded with {completed} increments applied, {pending} pending")]
    DeadlineExceeded {
        deadline: Duration,
        completed: usize,
        pending: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = AggregatorError> = std::result::Result<T, E>;
