//! Result store — append-only persistence for finished runs.
//!
//! One logical partition ("session") per optimizer invocation. The CSV
//! store lays a session out as a directory named by the Unix timestamp of
//! its creation, with `strategies.csv`, `orders.csv`, `trades.csv`, and
//! `balances.csv` created on first append, plus a `manifest.json`
//! describing the sweep. Files only ever grow.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use offsetlab_core::domain::{Order, Strategy, Trade};
use offsetlab_core::engine::RunOutcome;
use offsetlab_core::ledger::BalanceSnapshot;

use crate::optimizer::{StrategyBalance, SweepSummary};

/// Errors from result persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV rows: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only sink for one session's records.
pub trait ResultStore {
    fn append_strategies(&mut self, rows: &[Strategy]) -> Result<(), StoreError>;
    fn append_orders(&mut self, rows: &[Order]) -> Result<(), StoreError>;
    fn append_trades(&mut self, rows: &[Trade]) -> Result<(), StoreError>;
    fn append_balances(&mut self, rows: &[BalanceSnapshot]) -> Result<(), StoreError>;
}

/// Persist one finished run.
pub fn persist_run(store: &mut dyn ResultStore, run: &RunOutcome) -> Result<(), StoreError> {
    store.append_orders(&run.orders)?;
    store.append_trades(&run.trades)?;
    store.append_balances(&run.balances)?;
    Ok(())
}

/// Persist a whole sweep: the strategy table first, then every run.
pub fn persist_sweep(
    store: &mut dyn ResultStore,
    summary: &SweepSummary,
) -> Result<(), StoreError> {
    let strategies: Vec<Strategy> = summary.runs.iter().map(|r| r.strategy.clone()).collect();
    store.append_strategies(&strategies)?;
    for run in &summary.runs {
        persist_run(store, run)?;
    }
    Ok(())
}

/// Session metadata written alongside the CSV tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionManifest {
    pub session: String,
    pub config_id: String,
    pub combinations: usize,
    pub best_ending: Option<StrategyBalance>,
    pub best_anytime: Option<StrategyBalance>,
}

// ─── CSV store ──────────────────────────────────────────────────────

/// Result store writing CSV tables under `<root>/<session>/`.
#[derive(Debug, Clone)]
pub struct CsvResultStore {
    root: PathBuf,
    session: String,
}

impl CsvResultStore {
    /// A new session named by the current Unix timestamp.
    pub fn create(root: impl Into<PathBuf>) -> Self {
        Self::with_session(root, chrono::Utc::now().timestamp().to_string())
    }

    /// A session with an explicit name.
    pub fn with_session(root: impl Into<PathBuf>, session: impl Into<String>) -> Self {
        let store = Self {
            root: root.into(),
            session: session.into(),
        };
        debug!(session = %store.session, "result store session opened");
        store
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn session_dir(&self) -> PathBuf {
        self.root.join(&self.session)
    }

    /// Write the session manifest (overwrites a previous manifest for the
    /// same session; the CSV tables themselves only grow).
    pub fn write_manifest(&self, manifest: &SessionManifest) -> Result<(), StoreError> {
        let dir = self.session_dir();
        std::fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(manifest)?;
        std::fs::write(dir.join("manifest.json"), json)?;
        Ok(())
    }

    fn append_rows<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let dir = self.session_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{table}.csv"));
        let write_headers = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_headers)
            .from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ResultStore for CsvResultStore {
    fn append_strategies(&mut self, rows: &[Strategy]) -> Result<(), StoreError> {
        self.append_rows("strategies", rows)
    }

    fn append_orders(&mut self, rows: &[Order]) -> Result<(), StoreError> {
        self.append_rows("orders", rows)
    }

    fn append_trades(&mut self, rows: &[Trade]) -> Result<(), StoreError> {
        self.append_rows("trades", rows)
    }

    fn append_balances(&mut self, rows: &[BalanceSnapshot]) -> Result<(), StoreError> {
        self.append_rows("balances", rows)
    }
}

// ─── In-memory store ────────────────────────────────────────────────

/// Result store keeping everything in memory. Used by tests and callers
/// that reduce without persisting.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    pub strategies: Vec<Strategy>,
    pub orders: Vec<Order>,
    pub trades: Vec<Trade>,
    pub balances: Vec<BalanceSnapshot>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryResultStore {
    fn append_strategies(&mut self, rows: &[Strategy]) -> Result<(), StoreError> {
        self.strategies.extend_from_slice(rows);
        Ok(())
    }

    fn append_orders(&mut self, rows: &[Order]) -> Result<(), StoreError> {
        self.orders.extend_from_slice(rows);
        Ok(())
    }

    fn append_trades(&mut self, rows: &[Trade]) -> Result<(), StoreError> {
        self.trades.extend_from_slice(rows);
        Ok(())
    }

    fn append_balances(&mut self, rows: &[BalanceSnapshot]) -> Result<(), StoreError> {
        self.balances.extend_from_slice(rows);
        Ok(())
    }
}

/// Convenience: read a session table back as raw CSV text.
pub fn read_table(session_dir: &Path, table: &str) -> Result<String, StoreError> {
    Ok(std::fs::read_to_string(
        session_dir.join(format!("{table}.csv")),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use offsetlab_core::domain::{OrderId, OrderKind, StrategyId};

    fn snapshot(cash: f64) -> BalanceSnapshot {
        BalanceSnapshot {
            strategy_id: StrategyId(1),
            date: NaiveDate::from_ymd_opt(2023, 4, 10).unwrap(),
            order_balance: 0.0,
            cash_balance: cash,
            invested_balance: 0.0,
            shares: 0,
        }
    }

    fn order() -> Order {
        Order {
            id: OrderId(1),
            strategy_id: StrategyId(1),
            symbol: "QQQ".into(),
            shares: 110,
            side: offsetlab_core::domain::Side::Buy,
            kind: OrderKind::Limit,
            open_date: NaiveDate::from_ymd_opt(2023, 4, 11).unwrap(),
            close_date: NaiveDate::from_ymd_opt(2023, 4, 24).unwrap(),
            price: 9.025,
            total: 992.75,
            status: offsetlab_core::domain::OrderStatus::Pending,
        }
    }

    #[test]
    fn tables_are_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvResultStore::with_session(dir.path(), "test-session");

        assert!(!store.session_dir().exists());
        store.append_balances(&[snapshot(10_000.0)]).unwrap();

        assert!(store.session_dir().join("balances.csv").exists());
        assert!(!store.session_dir().join("orders.csv").exists());
    }

    #[test]
    fn appends_accumulate_without_repeating_headers() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvResultStore::with_session(dir.path(), "s");

        store.append_balances(&[snapshot(10_000.0)]).unwrap();
        store
            .append_balances(&[snapshot(11_000.0), snapshot(12_000.0)])
            .unwrap();

        let raw = read_table(&store.session_dir(), "balances").unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 4); // header + 3 rows
        assert!(lines[0].contains("cash_balance"));
        assert!(lines[1].contains("10000"));
        assert!(lines[3].contains("12000"));
    }

    #[test]
    fn orders_serialize_with_readable_enums() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvResultStore::with_session(dir.path(), "s");
        store.append_orders(&[order()]).unwrap();

        let raw = read_table(&store.session_dir(), "orders").unwrap();
        assert!(raw.contains("buy"));
        assert!(raw.contains("limit"));
        assert!(raw.contains("pending"));
        assert!(raw.contains("2023-04-11"));
    }

    #[test]
    fn empty_append_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvResultStore::with_session(dir.path(), "s");
        store.append_orders(&[]).unwrap();
        assert!(!store.session_dir().exists());
    }

    #[test]
    fn manifest_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvResultStore::with_session(dir.path(), "s");
        let manifest = SessionManifest {
            session: "s".into(),
            config_id: "abc".into(),
            combinations: 400,
            best_ending: None,
            best_anytime: None,
        };
        store.write_manifest(&manifest).unwrap();

        let raw = std::fs::read_to_string(store.session_dir().join("manifest.json")).unwrap();
        let parsed: SessionManifest = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.config_id, "abc");
        assert_eq!(parsed.combinations, 400);
    }

    #[test]
    fn memory_store_accumulates() {
        let mut store = MemoryResultStore::new();
        store.append_balances(&[snapshot(1.0)]).unwrap();
        store.append_balances(&[snapshot(2.0)]).unwrap();
        assert_eq!(store.balances.len(), 2);
        assert_eq!(store.balances[1].cash_balance, 2.0);
    }
}
