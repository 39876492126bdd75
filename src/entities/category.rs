// 🏷️ Category - the two payroll roles totals are grouped by
//
// External labels are lowercase role names. Parsing is case-insensitive but
// otherwise exact: no trimming, no prefixes, no aliases.

use crate::error::{AggregatorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Managerial role
    Boss,

    /// Individual contributor
    Developer,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Boss, Category::Developer];

    /// Parse an external label, e.g. "boss" or "DEVELOPER"
    pub fn parse(label: &str) -> Result<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| AggregatorError::InvalidCategory {
                label: label.to_string(),
            })
    }

    /// Canonical external label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Boss => "boss",
            Category::Developer => "developer",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self> {
        Category::parse(s)
    }
}

// ============================================================================
// TESTS
// ============================================================================
