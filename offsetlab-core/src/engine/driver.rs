//! Simulation driver — walks one strategy across its date window.
//!
//! The run is a three-state machine: not started (scanning for the first
//! bar inside the window), live (day loop), done (final snapshot emitted).
//! A start date past the end of the series is not an error; the run
//! completes trivially with only its opening snapshot.

use tracing::debug;

use crate::domain::{Bar, IdAllocator, Order, Strategy, Trade};
use crate::engine::day::{process_day, RunState};
use crate::ledger::{BalanceSnapshot, Ledger};

/// Everything a finished run hands to the result store.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub strategy: Strategy,
    pub orders: Vec<Order>,
    pub trades: Vec<Trade>,
    pub balances: Vec<BalanceSnapshot>,
}

impl RunOutcome {
    /// Rebase this run's ids by the given offsets.
    ///
    /// Runs executed in parallel use fresh allocators; shifting each run by
    /// the id counts of all runs before it reproduces the single-allocator
    /// sequence, keeping ids unique and increasing across the session.
    pub fn shift_ids(&mut self, order_offset: u64, trade_offset: u64) {
        for order in &mut self.orders {
            order.id.0 += order_offset;
        }
        for trade in &mut self.trades {
            trade.id.0 += trade_offset;
            trade.order_id.0 += order_offset;
        }
    }
}

/// Run one strategy against its symbol's price series.
///
/// `bars` must be sorted ascending by date. The allocator is threaded
/// explicitly so order/trade ids stay unique across every run that shares
/// it.
pub fn run_strategy(
    strategy: &Strategy,
    bars: &[Bar],
    starting_balance: f64,
    ids: &mut IdAllocator,
) -> RunOutcome {
    let ledger = Ledger::new(BalanceSnapshot::opening(
        strategy.id,
        strategy.start_date,
        starting_balance,
    ));

    let first_live_day = bars.iter().position(|bar| bar.date >= strategy.start_date);
    let Some(start_day) = first_live_day else {
        debug!(strategy_id = %strategy.id, "no bar at or after start date; trivial run");
        return RunOutcome {
            strategy: strategy.clone(),
            orders: Vec::new(),
            trades: Vec::new(),
            balances: ledger.into_history(),
        };
    };

    let mut state = RunState {
        strategy,
        bars,
        starting_balance,
        orders: Vec::new(),
        trades: Vec::new(),
        ledger,
        ids,
    };

    let mut day = start_day;
    loop {
        process_day(&mut state, day);

        let bar = &bars[day];
        // The window closes once the just-processed bar reaches the end
        // date; an exhausted series closes it as well.
        if bar.date >= strategy.end_date || day + 1 == bars.len() {
            let view = state.ledger.read(bar.close);
            state.ledger.append(BalanceSnapshot {
                strategy_id: strategy.id,
                date: bar.date,
                order_balance: view.order_balance,
                cash_balance: view.cash_balance,
                invested_balance: view.shares as f64 * bar.close,
                shares: view.shares,
            });
            break;
        }
        day += 1;
    }

    debug!(
        strategy_id = %strategy.id,
        orders = state.orders.len(),
        trades = state.trades.len(),
        "run complete"
    );

    RunOutcome {
        strategy: strategy.clone(),
        orders: state.orders,
        trades: state.trades,
        balances: state.ledger.into_history(),
    }
}
