// 🔍 Deduplication Engine - Drop records that repeat an identity
// The first occurrence in input order is the one that survives.

use crate::entities::Record;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

// ============================================================================
// MATCH STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Same identity, same amount, same category
    ExactCopy,

    /// Same identity but a different amount or category; the later value is lost
    Conflicting,
}

// ============================================================================
// DUPLICATE MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Index of the record that was kept
    pub kept_index: usize,

    /// Index of the record that was dropped
    pub dropped_index: usize,

    pub identity: String,

    pub strategy: MatchStrategy,
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct DeduplicationEngine;

impl DeduplicationEngine {
    pub fn new() -> Self {
        DeduplicationEngine
    }

    /// One record per distinct identity
    ///
    /// `HashSet::insert` never replaces an equal element, so whichever record
    /// is inserted first for an identity is the one kept.
    pub fn deduplicate(&self, records: &[Record]) -> HashSet<Record> {
        let mut unique = HashSet::with_capacity(records.len());
        for record in records {
            if !unique.contains(record) {
                unique.insert(record.clone());
            }
        }
        unique
    }

    /// Every dropped record, paired with the record that shadowed it
    pub fn find_duplicates(&self, records: &[Record]) -> Vec<DuplicateMatch> {
        let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        let mut matches = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let Some(&kept_index) = first_seen.get(record.identity()) else {
                first_seen.insert(record.identity(), index);
                continue;
            };

            let strategy = if records[kept_index].is_exact_copy_of(record) {
                MatchStrategy::ExactCopy
            } else {
                warn!(
                    identity = record.identity(),
                    kept_index,
                    dropped_index = index,
                    "conflicting duplicate dropped"
                );
                MatchStrategy::Conflicting
            };

            matches.push(DuplicateMatch {
                kept_index,
                dropped_index: index,
                identity: record.identity().to_string(),
                strategy,
            });
        }

        matches
    }
}

// ============================================================================
// TESTS
// ============================================================================
