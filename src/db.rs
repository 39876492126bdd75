// 🗄️ Accumulator store - per-category running totals behind a slow write path
//
// Every increment pays a fixed latency before it is applied, standing in for
// the round trip to a remote store. The latency is paid outside any lock; the
// lock only covers the add itself, and each category has its own lock.

use crate::entities::Category;
use crate::error::StoreError;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// Default per-increment latency
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(3);

// ============================================================================
// ACCUMULATOR TRAIT
// ============================================================================

/// Write side the aggregator drives, one call per record
pub trait Accumulator: Send + Sync {
    /// Add `amount` to the total for `category`
    fn increment(&self, category: Category, amount: Decimal) -> Result<(), StoreError>;

    /// Current total for `category`, not coordinated with in-flight writers
    fn total(&self, category: Category) -> Decimal;

    fn totals(&self) -> CategoryTotals {
        CategoryTotals {
            boss: self.total(Category::Boss),
            developer: self.total(Category::Developer),
        }
    }
}

// ============================================================================
// TOTALS SNAPSHOT
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub boss: Decimal,
    pub developer: Decimal,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> Decimal {
        match category {
            Category::Boss => self.boss,
            Category::Developer => self.developer,
        }
    }

    /// Sum across both categories
    pub fn grand_total(&self) -> Decimal {
        self.boss + self.developer
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory store, one independently locked total per category
///
/// Constructed by the caller and passed by reference into each run. Runs
/// against the same store keep accumulating; use a fresh store per run when
/// totals must start at zero.
pub struct AccumulatorStore {
    latency: Duration,
    boss: Slot,
    developer: Slot,
}

#[derive(Default)]
struct Slot {
    total: Mutex<Decimal>,
    increments: AtomicU64,
}

impl AccumulatorStore {
    pub fn new(latency: Duration) -> Self {
        AccumulatorStore {
            latency,
            boss: Slot::default(),
            developer: Slot::default(),
        }
    }

    /// Store without write latency, for tests and local tooling
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Number of increments applied to `category`
    pub fn increments(&self, category: Category) -> u64 {
        self.slot(category).increments.load(Ordering::Acquire)
    }

    fn slot(&self, category: Category) -> &Slot {
        match category {
            Category::Boss => &self.boss,
            Category::Developer => &self.developer,
        }
    }

    fn delay(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }
}

impl Default for AccumulatorStore {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl Accumulator for AccumulatorStore {
    fn increment(&self, category: Category, amount: Decimal) -> Result<(), StoreError> {
        self.delay();

        let slot = self.slot(category);
        let mut total = slot.total.lock();
        *total = total
            .checked_add(amount)
            .ok_or(StoreError::Overflow { category })?;
        slot.increments.fetch_add(1, Ordering::AcqRel);

        Ok(())
    }

    fn total(&self, category: Category) -> Decimal {
        *self.slot(category).total.lock()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_fresh_store_is_zero() {
        let store = AccumulatorStore::instant();

        assert_eq!(store.total(Category::Boss), Decimal::ZERO);
        assert_eq!(store.total(Category::Developer), Decimal::ZERO);
        assert_eq!(store.totals(), CategoryTotals::default());
    }

    #[test]
    fn test_increment_targets_one_category() {
        let store = AccumulatorStore::instant();

        store.increment(Category::Boss, dec!(10.50)).unwrap();
        store.increment(Category::Boss, dec!(0.25)).unwrap();
        store.increment(Category::Developer, dec!(3.00)).unwrap();

        assert_eq!(store.total(Category::Boss), dec!(10.75));
        assert_eq!(store.total(Category::Developer), dec!(3.00));
        assert_eq!(store.increments(Category::Boss), 2);
        assert_eq!(store.increments(Category::Developer), 1);
        assert_eq!(store.totals().grand_total(), dec!(13.75));
    }

    #[test]
    fn test_read_is_idempotent() {
        let store = AccumulatorStore::instant();
        store.increment(Category::Developer, dec!(7.00)).unwrap();

        let first = store.total(Category::Developer);
        let second = store.total(Category::Developer);
        assert_eq!(first, second);
    }

    #[test]
    fn test_overflow_leaves_total_unchanged() {
        let store = AccumulatorStore::instant();
        store.increment(Category::Boss, Decimal::MAX).unwrap();

        let err = store.increment(Category::Boss, dec!(1)).unwrap_err();

        assert_eq!(err, StoreError::Overflow { category: Category::Boss });
        assert_eq!(store.total(Category::Boss), Decimal::MAX);
        assert_eq!(store.increments(Category::Boss), 1);
    }

    #[test]
    fn test_concurrent_increments_do_not_lose_updates() {
        let store = Arc::new(AccumulatorStore::instant());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..500 {
                        store.increment(Category::Boss, dec!(0.01)).unwrap();
                        store.increment(Category::Developer, dec!(1)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.total(Category::Boss), dec!(40.00));
        assert_eq!(store.total(Category::Developer), dec!(4000));
        assert_eq!(store.increments(Category::Boss), 4000);
    }

    #[test]
    fn test_latency_is_not_serialized_by_the_lock() {
        let store = Arc::new(AccumulatorStore::new(Duration::from_millis(20)));
        let started = Instant::now();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                let category = Category::ALL[i % 2];
                thread::spawn(move || store.increment(category, dec!(1)).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // ten serialized writes would take 200ms
        assert!(started.elapsed() < Duration::from_millis(150));
        assert_eq!(store.totals().grand_total(), dec!(10));
    }
}
