// Payroll Aggregator - Core Library
// Per-category salary totals over deduplicated records, written concurrently
// into a latency-bound accumulator store.

pub mod aggregator;
pub mod config;
pub mod db;
pub mod deduplication;
pub mod entities;
pub mod error;
pub mod logging;
pub mod parser;
pub mod report;

// Re-export commonly used types
pub use aggregator::ConcurrentAggregator;
pub use config::AggregatorConfig;
pub use db::{Accumulator, AccumulatorStore, CategoryTotals};
pub use deduplication::{DeduplicationEngine, DuplicateMatch, MatchStrategy};
pub use entities::{Category, Record};
pub use error::{AggregatorError, StoreError};
pub use parser::{load_csv, parse_reader, synthetic_records, RawRecord};
pub use report::AggregationReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
