//! The day processor: six ordered sub-steps applied to each trading day.
//!
//! Step order is load-bearing — it decides which fills are visible to later
//! steps on the same day:
//!
//! 1. Fill pending market sells at the open.
//! 2. Fill pending limit sells.
//! 3. Fill pending limit buys (each fill stages its paired limit sell).
//! 4. Convert stale limit sells to market orders.
//! 5. Expire stale buys, releasing their reservations.
//! 6. Open the day's new limit buy.
//!
//! Every step scans the entire order book for the run; an order is eligible
//! no matter how long it has been outstanding. Each step takes one ledger
//! read at scan entry and works from those locals for the whole scan; only
//! the stale-buy step accumulates its release arithmetic across iterations.

use crate::domain::{Bar, IdAllocator, Order, OrderKind, OrderStatus, Side, Strategy, Trade};
use crate::ledger::{BalanceSnapshot, Ledger};

/// Mutable state of one strategy run while its day loop is live.
pub(crate) struct RunState<'a> {
    pub strategy: &'a Strategy,
    pub bars: &'a [Bar],
    pub starting_balance: f64,
    pub orders: Vec<Order>,
    pub trades: Vec<Trade>,
    pub ledger: Ledger,
    pub ids: &'a mut IdAllocator,
}

/// Lowest price a buy limit can reach today. The day's full range counts.
fn buy_floor(bar: &Bar) -> f64 {
    bar.open.min(bar.low).min(bar.close)
}

/// Highest price a sell limit can reach today. The day's low is excluded
/// from this probe.
fn sell_ceiling(bar: &Bar) -> f64 {
    bar.open.max(bar.high).max(bar.close)
}

pub(crate) fn process_day(state: &mut RunState<'_>, day: usize) {
    execute_market_sells(state, day);
    execute_limit_sells(state, day);
    execute_limit_buys(state, day);
    convert_stale_sells(state, day);
    expire_stale_buys(state, day);
    open_new_buy(state, day);
}

/// Step 1: every pending market sell fills unconditionally at today's open.
fn execute_market_sells(state: &mut RunState<'_>, day: usize) {
    let bar = &state.bars[day];
    let view = state.ledger.read(bar.close);

    for order in state.orders.iter_mut() {
        if !(order.is_active() && order.side == Side::Sell && order.kind == OrderKind::Market) {
            continue;
        }

        let total = order.shares as f64 * bar.open;
        // The fill adds the order's shares to the scan-entry count.
        let shares = order.shares + view.shares;

        state.trades.push(Trade {
            id: state.ids.next_trade_id(),
            order_id: order.id,
            shares: order.shares,
            date: bar.date,
            price: bar.open,
            total,
        });
        state.ledger.append(BalanceSnapshot {
            strategy_id: state.strategy.id,
            date: bar.date,
            order_balance: view.order_balance,
            cash_balance: view.cash_balance + total,
            invested_balance: shares as f64 * bar.close,
            shares,
        });
        order.fill();
    }
}

/// Step 2: a pending limit sell still inside its window fills when its limit
/// is within reach of today's ceiling. The fill price is never worse than
/// the open for the seller.
fn execute_limit_sells(state: &mut RunState<'_>, day: usize) {
    let bar = &state.bars[day];
    let view = state.ledger.read(bar.close);

    for order in state.orders.iter_mut() {
        if !(order.is_active()
            && order.side == Side::Sell
            && order.kind == OrderKind::Limit
            && order.close_date >= bar.date)
        {
            continue;
        }
        if order.price > sell_ceiling(bar) {
            continue;
        }

        let fill_price = order.price.max(bar.open);
        let total = order.shares as f64 * fill_price;
        let shares = view.shares - order.shares;

        state.ledger.append(BalanceSnapshot {
            strategy_id: state.strategy.id,
            date: bar.date,
            order_balance: view.order_balance,
            cash_balance: view.cash_balance + total,
            invested_balance: shares as f64 * bar.close,
            shares,
        });
        order.fill();
        state.trades.push(Trade {
            id: state.ids.next_trade_id(),
            order_id: order.id,
            shares: order.shares,
            date: bar.date,
            price: fill_price,
            total,
        });
    }
}

/// Step 3: a pending buy still inside its window fills when its limit is
/// within reach of today's floor. The fill price is never worse than the
/// open for the buyer; any favorable difference against the reservation is
/// refunded to cash. Each fill immediately stages the paired limit sell at
/// `fill × sell_offset`, opening on the next bar.
fn execute_limit_buys(state: &mut RunState<'_>, day: usize) {
    let bar = &state.bars[day];
    let view = state.ledger.read(bar.close);
    let mut staged_sells = Vec::new();

    for order in state.orders.iter_mut() {
        if !(order.is_active() && order.side == Side::Buy && order.close_date >= bar.date) {
            continue;
        }
        if order.price < buy_floor(bar) {
            continue;
        }

        let fill_price = order.price.min(bar.open);
        let cost = order.shares as f64 * fill_price;
        let shares = view.shares + order.shares;

        state.ledger.append(BalanceSnapshot {
            strategy_id: state.strategy.id,
            date: bar.date,
            order_balance: view.order_balance - order.total,
            cash_balance: view.cash_balance + order.total - cost,
            invested_balance: shares as f64 * bar.close,
            shares,
        });
        order.fill();
        state.trades.push(Trade {
            id: state.ids.next_trade_id(),
            order_id: order.id,
            shares: order.shares,
            date: bar.date,
            price: fill_price,
            total: cost,
        });

        // No bar left to open on: the exit cannot be staged.
        if day + 1 >= state.bars.len() {
            continue;
        }
        let sale_price = fill_price * state.strategy.sell_offset;
        let close_index = (day + 1 + state.strategy.order_duration).min(state.bars.len() - 1);
        staged_sells.push(Order {
            id: state.ids.next_order_id(),
            strategy_id: state.strategy.id,
            symbol: state.strategy.symbol.clone(),
            shares: order.shares,
            side: Side::Sell,
            kind: OrderKind::Limit,
            open_date: state.bars[day + 1].date,
            close_date: state.bars[close_index].date,
            price: sale_price,
            total: order.shares as f64 * sale_price,
            status: OrderStatus::Pending,
        });
    }

    state.orders.extend(staged_sells);
}

/// Step 4: a pending limit sell past its window converts to a market order.
/// It fills at the next day's open via step 1. No snapshot here.
fn convert_stale_sells(state: &mut RunState<'_>, day: usize) {
    let bar = &state.bars[day];
    for order in state.orders.iter_mut() {
        if order.is_active()
            && order.side == Side::Sell
            && order.kind == OrderKind::Limit
            && order.close_date <= bar.date
        {
            order.convert_to_market();
        }
    }
}

/// Step 5: a pending buy past its window expires without executing; its
/// reservation flows back from order balance to cash.
fn expire_stale_buys(state: &mut RunState<'_>, day: usize) {
    let bar = &state.bars[day];
    let view = state.ledger.read(bar.close);
    let mut order_balance = view.order_balance;
    let mut cash_balance = view.cash_balance;

    for order in state.orders.iter_mut() {
        if !(order.is_active() && order.side == Side::Buy && order.close_date <= bar.date) {
            continue;
        }

        order_balance -= order.total;
        cash_balance += order.total;
        state.ledger.append(BalanceSnapshot {
            strategy_id: state.strategy.id,
            date: bar.date,
            order_balance,
            cash_balance,
            invested_balance: view.invested_balance,
            shares: view.shares,
        });
        order.expire();
    }
}

/// Step 6: open the day's new limit buy at `close × buy_offset`, sized from
/// the lesser of the configured order amount and current cash. Degenerate
/// sizings (no cash, zero shares) skip the day silently. Opening is also
/// skipped on the final bar — there is no next day for the order to live on.
fn open_new_buy(state: &mut RunState<'_>, day: usize) {
    let bar = &state.bars[day];
    let view = state.ledger.read(bar.close);

    if view.cash_balance <= 0.0 {
        return;
    }
    let default_amount = state.starting_balance * state.strategy.order_amount_ratio;
    let order_amount = default_amount.min(view.cash_balance);
    let limit_price = bar.close * state.strategy.buy_offset;
    if limit_price <= 0.0 {
        return;
    }
    let shares = (order_amount / limit_price) as u64;
    if shares == 0 {
        return;
    }
    if day + 1 >= state.bars.len() {
        return;
    }

    let open_date = state.bars[day + 1].date;
    let close_index = (day + 1 + state.strategy.order_duration).min(state.bars.len() - 1);
    let total = limit_price * shares as f64;

    state.orders.push(Order {
        id: state.ids.next_order_id(),
        strategy_id: state.strategy.id,
        symbol: state.strategy.symbol.clone(),
        shares,
        side: Side::Buy,
        kind: state.strategy.entry_kind,
        open_date,
        close_date: state.bars[close_index].date,
        price: limit_price,
        total,
        status: OrderStatus::Pending,
    });
    // The reservation snapshot carries the new order's open date.
    state.ledger.append(BalanceSnapshot {
        strategy_id: state.strategy.id,
        date: open_date,
        order_balance: view.order_balance + total,
        cash_balance: view.cash_balance - total,
        invested_balance: view.invested_balance,
        shares: view.shares,
    });
}
