//! Append-only balance ledger.
//!
//! The ledger is "current state + immutable history": every mutating step of
//! the day processor appends a fresh snapshot, and the current state is
//! always the last snapshot. History is never rewritten. Several snapshots
//! may share a date; the latest appended one is authoritative.

use crate::domain::StrategyId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point-in-time balance record.
///
/// `order_balance` is cash reserved by open buy orders, `cash_balance` is
/// free cash, `invested_balance` is `shares × close` at the time of the
/// snapshot. The three together are the strategy's total equity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub strategy_id: StrategyId,
    pub date: NaiveDate,
    pub order_balance: f64,
    pub cash_balance: f64,
    pub invested_balance: f64,
    pub shares: u64,
}

impl BalanceSnapshot {
    /// The snapshot every run starts from: all cash, nothing reserved or
    /// invested, dated at the strategy's start date.
    pub fn opening(strategy_id: StrategyId, date: NaiveDate, cash: f64) -> Self {
        Self {
            strategy_id,
            date,
            order_balance: 0.0,
            cash_balance: cash,
            invested_balance: 0.0,
            shares: 0,
        }
    }

    /// Total equity: reserved + free + invested.
    pub fn total(&self) -> f64 {
        self.order_balance + self.cash_balance + self.invested_balance
    }
}

/// A read of the current ledger state with the invested leg marked to a
/// given closing price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerView {
    pub order_balance: f64,
    pub cash_balance: f64,
    pub invested_balance: f64,
    pub shares: u64,
}

/// The snapshot history for one strategy run.
#[derive(Debug, Clone)]
pub struct Ledger {
    history: Vec<BalanceSnapshot>,
}

impl Ledger {
    /// A ledger always starts from an opening snapshot, so `current` is
    /// total (never empty).
    pub fn new(opening: BalanceSnapshot) -> Self {
        Self {
            history: vec![opening],
        }
    }

    /// Current state, with `invested_balance` recomputed at `close`.
    pub fn read(&self, close: f64) -> LedgerView {
        let last = self.current();
        LedgerView {
            order_balance: last.order_balance,
            cash_balance: last.cash_balance,
            invested_balance: last.shares as f64 * close,
            shares: last.shares,
        }
    }

    pub fn append(&mut self, snapshot: BalanceSnapshot) {
        self.history.push(snapshot);
    }

    /// The latest appended snapshot.
    pub fn current(&self) -> &BalanceSnapshot {
        self.history.last().expect("ledger history is never empty")
    }

    pub fn history(&self) -> &[BalanceSnapshot] {
        &self.history
    }

    pub fn into_history(self) -> Vec<BalanceSnapshot> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening() -> BalanceSnapshot {
        BalanceSnapshot::opening(
            StrategyId(1),
            NaiveDate::from_ymd_opt(2023, 4, 10).unwrap(),
            10_000.0,
        )
    }

    #[test]
    fn opening_snapshot_is_all_cash() {
        let snap = opening();
        assert_eq!(snap.cash_balance, 10_000.0);
        assert_eq!(snap.order_balance, 0.0);
        assert_eq!(snap.invested_balance, 0.0);
        assert_eq!(snap.shares, 0);
        assert_eq!(snap.total(), 10_000.0);
    }

    #[test]
    fn read_marks_invested_to_close() {
        let mut ledger = Ledger::new(opening());
        ledger.append(BalanceSnapshot {
            shares: 10,
            cash_balance: 9_000.0,
            invested_balance: 1_000.0,
            ..opening()
        });

        let view = ledger.read(110.0);
        assert_eq!(view.shares, 10);
        assert_eq!(view.invested_balance, 1_100.0);
        assert_eq!(view.cash_balance, 9_000.0);
    }

    #[test]
    fn current_is_latest_appended() {
        let mut ledger = Ledger::new(opening());
        let mut later = opening();
        later.cash_balance = 9_500.0;
        ledger.append(later.clone());

        assert_eq!(ledger.current(), &later);
        assert_eq!(ledger.history().len(), 2);
        // same date, latest wins
        assert_eq!(ledger.history()[0].date, ledger.history()[1].date);
    }

    #[test]
    fn history_preserves_insertion_order() {
        let mut ledger = Ledger::new(opening());
        for cash in [9_000.0, 8_000.0, 7_000.0] {
            let mut snap = opening();
            snap.cash_balance = cash;
            ledger.append(snap);
        }
        let cash: Vec<f64> = ledger
            .into_history()
            .iter()
            .map(|s| s.cash_balance)
            .collect();
        assert_eq!(cash, vec![10_000.0, 9_000.0, 8_000.0, 7_000.0]);
    }
}
