//! The built-in reference strategy set.
//!
//! Three offset variants per symbol plus a buy-and-hold baseline per
//! symbol. Buy-and-hold is expressed in the same vocabulary as the offset
//! strategies: buy at the full close price, park the exit far out of
//! reach, never let the entry expire, and commit the whole balance.

use chrono::NaiveDate;
use offsetlab_core::domain::{OrderKind, Strategy, StrategyId};

const OFFSET_NAME: &str = "limit buy below close, limit sell above fill";
const OFFSET_DESCRIPTION: &str = "Stage a limit buy at close × buy offset; once it fills, stage a \
     limit sell at fill × sell offset. Unfilled orders expire after the \
     configured number of trading days.";
const HOLD_NAME: &str = "buy and hold";
const HOLD_DESCRIPTION: &str = "Buy at the start date and hold through the end date.";

/// The reference strategies over QQQ and RITM, ids 1–8 in a fixed order.
pub fn reference_strategies(start_date: NaiveDate, end_date: NaiveDate) -> Vec<Strategy> {
    let mut strategies = Vec::with_capacity(8);
    let mut next_id = 0u64;

    let mut offset = |symbol: &str, buy_offset: f64, sell_offset: f64| {
        next_id += 1;
        Strategy {
            id: StrategyId(next_id),
            name: OFFSET_NAME.into(),
            description: OFFSET_DESCRIPTION.into(),
            buy_offset,
            sell_offset,
            entry_kind: OrderKind::Limit,
            order_duration: 10,
            order_amount_ratio: 0.1,
            symbol: symbol.into(),
            start_date,
            end_date,
        }
    };

    strategies.push(offset("QQQ", 0.95, 1.10));
    strategies.push(offset("QQQ", 0.97, 1.06));
    strategies.push(offset("QQQ", 0.99, 1.02));
    strategies.push(offset("RITM", 0.95, 1.10));
    strategies.push(offset("RITM", 0.97, 1.06));
    strategies.push(offset("RITM", 0.99, 1.02));

    for symbol in ["QQQ", "RITM"] {
        next_id += 1;
        strategies.push(Strategy {
            id: StrategyId(next_id),
            name: HOLD_NAME.into(),
            description: HOLD_DESCRIPTION.into(),
            buy_offset: 1.0,
            sell_offset: 1_000.0,
            entry_kind: OrderKind::Limit,
            order_duration: 100_000,
            order_amount_ratio: 1.0,
            symbol: symbol.into(),
            start_date,
            end_date,
        });
    }

    strategies
}
