// ⚡ Concurrent Aggregator - fan increments out over a fixed worker pool
//
// Flow: deduplicate → partition by category → one increment per record on
// the pool → wait for every completion (or the deadline) → read totals.
//
// Each increment pays the store's latency on its own, so throughput comes
// from running many of them at once, never from pre-summing.

use crate::config::AggregatorConfig;
use crate::db::Accumulator;
use crate::deduplication::DeduplicationEngine;
use crate::entities::{Category, Record};
use crate::error::{AggregatorError, Result, StoreError};
use crate::report::AggregationReport;
use chrono::Utc;
use crossbeam::channel::{self, RecvTimeoutError};
use rayon::{ThreadPool, ThreadPoolBuilder};
use rust_decimal::Decimal;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// ============================================================================
// PARTITION
// ============================================================================

/// Surviving amounts grouped by category
#[derive(Debug, Default)]
struct Partition {
    boss: Vec<Decimal>,
    developer: Vec<Decimal>,
}

impl Partition {
    fn from_records(records: &HashSet<Record>) -> Self {
        let mut partition = Partition::default();
        for record in records {
            match record.category() {
                Category::Boss => partition.boss.push(record.amount()),
                Category::Developer => partition.developer.push(record.amount()),
            }
        }
        partition
    }

    fn len(&self) -> usize {
        self.boss.len() + self.developer.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Work items alternating between categories so both make progress
    fn interleaved(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        let longest = self.boss.len().max(self.developer.len());
        (0..longest).flat_map(move |i| {
            let boss = self.boss.get(i).map(|&amount| (Category::Boss, amount));
            let developer = self.developer.get(i).map(|&amount| (Category::Developer, amount));
            boss.into_iter().chain(developer)
        })
    }
}

// ============================================================================
// CONCURRENT AGGREGATOR
// ============================================================================

pub struct ConcurrentAggregator {
    config: AggregatorConfig,
    pool: ThreadPool,
    dedup: DeduplicationEngine,
}

impl ConcurrentAggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("payroll-worker-{}", i))
            .build()?;

        Ok(ConcurrentAggregator {
            config,
            pool,
            dedup: DeduplicationEngine::new(),
        })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Run with the configured deadline
    pub fn aggregate_with_default_deadline<A>(
        &self,
        records: &[Record],
        store: &A,
    ) -> Result<AggregationReport>
    where
        A: Accumulator + ?Sized,
    {
        self.aggregate(records, store, self.config.deadline)
    }

    /// Deduplicate `records` and add every survivor's amount into `store`
    ///
    /// Returns once every increment has been applied. On failure or deadline
    /// no new increments are started, in-flight ones finish, and whatever was
    /// applied stays in the store.
    ///
    /// A zero `deadline` fails with `DeadlineExceeded` before anything is
    /// dispatched unless there is nothing to apply. A deadline too large to
    /// add to the start time (e.g. `Duration::MAX`) means no deadline.
    pub fn aggregate<A>(
        &self,
        records: &[Record],
        store: &A,
        deadline: Duration,
    ) -> Result<AggregationReport>
    where
        A: Accumulator + ?Sized,
    {
        let started = Instant::now();
        let started_at = Utc::now();

        let unique = self.dedup.deduplicate(records);
        let partition = Partition::from_records(&unique);

        debug!(
            input = records.len(),
            unique = unique.len(),
            boss = partition.boss.len(),
            developer = partition.developer.len(),
            workers = self.config.workers,
            "dispatching increments"
        );

        let applied = if partition.is_empty() {
            0
        } else if deadline.is_zero() {
            warn!(pending = partition.len(), "zero deadline, nothing dispatched");
            return Err(AggregatorError::DeadlineExceeded {
                deadline,
                completed: 0,
                pending: partition.len(),
            });
        } else {
            self.drive(&partition, store, started.checked_add(deadline), deadline)?
        };

        let report = AggregationReport {
            run_id: Uuid::new_v4(),
            started_at,
            elapsed_ms: started.elapsed().as_millis() as u64,
            workers: self.config.workers,
            input_records: records.len(),
            unique_records: unique.len(),
            duplicates_dropped: records.len() - unique.len(),
            increments_applied: applied,
            totals: store.totals(),
        };

        info!(
            run_id = %report.run_id,
            elapsed_ms = report.elapsed_ms,
            increments = applied,
            boss = %report.totals.boss,
            developer = %report.totals.developer,
            "aggregation complete"
        );

        Ok(report)
    }

    /// Spawn one increment per item and wait for all of them
    ///
    /// `cutoff` of `None` waits without a time limit.
    fn drive<A>(
        &self,
        partition: &Partition,
        store: &A,
        cutoff: Option<Instant>,
        deadline: Duration,
    ) -> Result<usize>
    where
        A: Accumulator + ?Sized,
    {
        let total = partition.len();
        let cancelled = AtomicBool::new(false);
        let (tx, rx) = channel::unbounded::<Result<(), StoreError>>();

        // in_place_scope does not return until every spawned job has run,
        // which is the barrier callers rely on.
        self.pool.in_place_scope(|scope| {
            for (category, amount) in partition.interleaved() {
                let tx = tx.clone();
                let cancelled = &cancelled;
                scope.spawn(move |_| {
                    if cancelled.load(Ordering::Acquire) {
                        return;
                    }
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| store.increment(category, amount)))
                            .unwrap_or_else(|payload| {
                                Err(StoreError::WorkerPanicked(panic_message(payload.as_ref())))
                            });
                    // receiver is gone once the run has already failed
                    let _ = tx.send(outcome);
                });
            }
            drop(tx);

            let mut applied = 0;
            while applied < total {
                let received = match cutoff {
                    Some(cutoff) => rx.recv_deadline(cutoff),
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };
                match received {
                    Ok(Ok(())) => applied += 1,
                    Ok(Err(source)) => {
                        cancelled.store(true, Ordering::Release);
                        error!(completed = applied, error = %source, "increment failed, stopping dispatch");
                        return Err(AggregatorError::AggregationFailed {
                            completed: applied,
                            source,
                        });
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        cancelled.store(true, Ordering::Release);
                        warn!(
                            deadline_ms = deadline.as_millis() as u64,
                            completed = applied,
                            pending = total - applied,
                            "deadline exceeded, stopping dispatch"
                        );
                        return Err(AggregatorError::DeadlineExceeded {
                            deadline,
                            completed: applied,
                            pending: total - applied,
                        });
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(AggregatorError::AggregationFailed {
                            completed: applied,
                            source: StoreError::Unavailable(
                                "increment workers exited before reporting".to_string(),
                            ),
                        });
                    }
                }
            }

            Ok(applied)
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================
