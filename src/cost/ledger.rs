//! Session-wide cost accumulation.
//!
//! The ledger is created once per process and handed to whoever runs the
//! pipeline (usually wrapped in an `Arc`). [`SessionCostLedger::accumulate`]
//! is the only way to change it; updates are serialized behind a mutex so
//! concurrent runs cannot lose an increment.

use super::pricing::{CostEstimate, round_currency};
use crate::generation::UsageRecord;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

/// Point-in-time view of the session totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LedgerSnapshot {
    pub total_cost: f64,
    pub run_count: u64,
    pub total_tokens: u64,
}

/// Cumulative cost and run counter for the current operator session.
#[derive(Debug, Default)]
pub struct SessionCostLedger {
    inner: Mutex<LedgerSnapshot>,
}

impl SessionCostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one completed run to the session totals and return the new totals.
    ///
    /// Totals never decrease: a negative or non-finite estimate adds nothing
    /// to `total_cost`, but the run is still counted.
    pub fn accumulate(&self, usage: &UsageRecord, estimate: &CostEstimate) -> LedgerSnapshot {
        let charge = if estimate.total_cost.is_finite() {
            estimate.total_cost.max(0.0)
        } else {
            0.0
        };

        let mut totals = self.lock();
        totals.total_cost = round_currency(totals.total_cost + charge);
        totals.run_count += 1;
        totals.total_tokens += usage.total_tokens();
        *totals
    }

    /// Current totals.
    pub fn snapshot(&self) -> LedgerSnapshot {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerSnapshot> {
        // A panic while holding the lock cannot leave a half-applied update.
        self.inner.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn estimate(total: f64) -> CostEstimate {
        CostEstimate {
            input_cost: 0.0,
            output_cost: total,
            total_cost: total,
        }
    }

    fn usage(input: u64, output: u64) -> UsageRecord {
        UsageRecord {
            input_tokens: input,
            output_tokens: output,
        }
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = SessionCostLedger::new();
        assert_eq!(ledger.snapshot(), LedgerSnapshot::default());
    }

    #[test]
    fn test_accumulate_n_times() {
        let ledger = SessionCostLedger::new();
        let costs = [0.0105, 0.002, 0.123456, 0.0, 0.5];

        for cost in costs {
            ledger.accumulate(&usage(100, 50), &estimate(cost));
        }

        let totals = ledger.snapshot();
        let expected: f64 = costs.iter().sum();
        assert_eq!(totals.run_count, costs.len() as u64);
        assert!((totals.total_cost - expected).abs() < 1e-6);
        assert_eq!(totals.total_tokens, 150 * costs.len() as u64);
    }

    #[test]
    fn test_accumulate_is_monotonic() {
        let ledger = SessionCostLedger::new();
        let mut previous = ledger.snapshot();

        for cost in [0.01, -5.0, f64::NAN, 0.0, 0.02] {
            let next = ledger.accumulate(&usage(1, 1), &estimate(cost));
            assert!(next.total_cost >= previous.total_cost);
            assert!(next.run_count > previous.run_count);
            previous = next;
        }

        assert_eq!(previous.run_count, 5);
        assert!((previous.total_cost - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_concurrent_accumulate_loses_nothing() {
        let ledger = Arc::new(SessionCostLedger::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        ledger.accumulate(&usage(10, 5), &estimate(0.001));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let totals = ledger.snapshot();
        assert_eq!(totals.run_count, 800);
        assert_eq!(totals.total_tokens, 800 * 15);
        assert!((totals.total_cost - 0.8).abs() < 1e-6);
    }
}
