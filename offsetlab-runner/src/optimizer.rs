//! Grid optimizer — run every combination, reduce to the two best.
//!
//! Runs are independent, so the sweep executes them in parallel with
//! run-local id allocators and renumbers the results in combination order
//! afterwards. The renumbered sweep is byte-identical to running the grid
//! sequentially through a single allocator: ids stay unique and strictly
//! increasing across the whole session.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

use offsetlab_core::data::{DataError, PriceSource};
use offsetlab_core::domain::{Bar, IdAllocator, Strategy, StrategyId};
use offsetlab_core::engine::{run_strategy, RunOutcome};
use offsetlab_core::ledger::BalanceSnapshot;

use crate::config::SweepConfig;

/// Errors from sweep execution.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("no price series loaded for symbol '{0}'")]
    MissingSymbol(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// One strategy's standing in a reduction: its id, the winning total
/// equity, and the snapshot that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBalance {
    pub strategy_id: StrategyId,
    pub total: f64,
    pub snapshot: BalanceSnapshot,
}

/// A finished sweep: every run plus the two reductions.
#[derive(Debug)]
pub struct SweepSummary {
    pub runs: Vec<RunOutcome>,
    pub best_ending: Option<StrategyBalance>,
    pub best_anytime: Option<StrategyBalance>,
}

/// Execute a configured sweep against a price source.
pub fn run_sweep(
    config: &SweepConfig,
    source: &dyn PriceSource,
) -> Result<SweepSummary, SweepError> {
    let strategies = config.strategies();

    let mut prices = BTreeMap::new();
    for symbol in &config.symbols {
        prices.insert(symbol.clone(), source.load(symbol)?);
    }

    info!(
        combinations = strategies.len(),
        symbols = config.symbols.len(),
        "starting sweep"
    );
    let runs = run_strategies(&strategies, &prices, config.starting_balance)?;

    let best_ending = best_ending_balance(&runs);
    let best_anytime = best_anytime_balance(&runs);
    info!(
        best_ending = best_ending.as_ref().map(|b| b.strategy_id.0),
        best_anytime = best_anytime.as_ref().map(|b| b.strategy_id.0),
        "sweep complete"
    );

    Ok(SweepSummary {
        runs,
        best_ending,
        best_anytime,
    })
}

/// Run a list of strategies against pre-loaded prices.
///
/// Results come back in input order with globally renumbered ids.
pub fn run_strategies(
    strategies: &[Strategy],
    prices: &BTreeMap<String, Vec<Bar>>,
    starting_balance: f64,
) -> Result<Vec<RunOutcome>, SweepError> {
    for strategy in strategies {
        if !prices.contains_key(&strategy.symbol) {
            return Err(SweepError::MissingSymbol(strategy.symbol.clone()));
        }
    }

    let mut runs: Vec<RunOutcome> = strategies
        .par_iter()
        .map(|strategy| {
            let mut ids = IdAllocator::new();
            run_strategy(strategy, &prices[&strategy.symbol], starting_balance, &mut ids)
        })
        .collect();

    let mut order_offset = 0u64;
    let mut trade_offset = 0u64;
    for run in &mut runs {
        run.shift_ids(order_offset, trade_offset);
        order_offset += run.orders.len() as u64;
        trade_offset += run.trades.len() as u64;
    }

    Ok(runs)
}

/// The strategy whose final snapshot carries the largest total equity.
///
/// Strict greater-than over runs in insertion order: the first strategy to
/// reach a given maximum keeps it, so the lowest id wins ties. Reductions
/// are pure — applying one twice yields the same answer.
pub fn best_ending_balance(runs: &[RunOutcome]) -> Option<StrategyBalance> {
    let mut best: Option<StrategyBalance> = None;
    for run in runs {
        let Some(last) = run.balances.last() else {
            continue;
        };
        let total = last.total();
        if best.as_ref().map_or(true, |b| total > b.total) {
            best = Some(StrategyBalance {
                strategy_id: run.strategy.id,
                total,
                snapshot: last.clone(),
            });
        }
    }
    best
}

/// The strategy with the largest total equity observed at any snapshot.
pub fn best_anytime_balance(runs: &[RunOutcome]) -> Option<StrategyBalance> {
    let mut best: Option<StrategyBalance> = None;
    for run in runs {
        for snapshot in &run.balances {
            let total = snapshot.total();
            if best.as_ref().map_or(true, |b| total > b.total) {
                best = Some(StrategyBalance {
                    strategy_id: snapshot.strategy_id,
                    total,
                    snapshot: snapshot.clone(),
                });
            }
        }
    }
    best
}
