// 🧾 Record - one salary line with identity-by-name
//
// "Identity is the key, the rest is value": two records with the same
// identity are the same record no matter what amount or category they carry.

use crate::entities::Category;
use crate::error::{AggregatorError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    identity: String,
    amount: Decimal,
    category: Category,
}

impl Record {
    /// Validate raw string inputs and build a record
    ///
    /// The category is checked first, so a row that is wrong in both fields
    /// reports `InvalidCategory`.
    pub fn create(
        identity: impl Into<String>,
        raw_amount: &str,
        raw_category: &str,
    ) -> Result<Record> {
        let identity = identity.into();
        let category = Category::parse(raw_category)?;
        let amount = Decimal::from_str(raw_amount).map_err(|_| AggregatorError::InvalidAmount {
            identity: identity.clone(),
            raw: raw_amount.to_string(),
        })?;

        Ok(Record::new(identity, amount, category))
    }

    pub fn new(identity: impl Into<String>, amount: Decimal, category: Category) -> Record {
        Record {
            identity: identity.into(),
            amount,
            category,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Same identity and same values
    pub fn is_exact_copy_of(&self, other: &Record) -> bool {
        self.identity == other.identity
            && self.amount == other.amount
            && self.category == other.category
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    #[test]
    fn test_create_valid_record() {
        let record = Record::create("Name1_0", "1500.25", "Boss").unwrap();

        assert_eq!(record.identity(), "Name1_0");
        assert_eq!(record.amount(), dec!(1500.25));
        assert_eq!(record.category(), Category::Boss);
    }

    #[test]
    fn test_create_rejects_bad_amount() {
        let err = Record::create("Name1_0", "notanumber", "boss").unwrap_err();

        match err {
            AggregatorError::InvalidAmount { identity, raw } => {
                assert_eq!(identity, "Name1_0");
                assert_eq!(raw, "notanumber");
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_bad_category() {
        let err = Record::create("Name1_0", "1.00", "manager").unwrap_err();
        assert!(matches!(err, AggregatorError::InvalidCategory { .. }));
    }

    #[test]
    fn test_equality_and_hash_use_identity_only() {
        let a = Record::new("A", dec!(1.00), Category::Boss);
        let b = Record::new("A", dec!(999.00), Category::Developer);
        let c = Record::new("C", dec!(1.00), Category::Boss);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_exact_copy_of(&b));

        let set: HashSet<Record> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_amount_keeps_scale() {
        let record = Record::create("X", "2.50", "developer").unwrap();
        assert_eq!(record.amount().to_string(), "2.50");
    }
}
