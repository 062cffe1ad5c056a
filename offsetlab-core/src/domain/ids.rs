//! Sequential ids for strategies, orders, and trades.
//!
//! Order and trade ids are unique across an entire session, not per run.
//! The allocator is threaded explicitly through the driver and optimizer —
//! there is no shared global counter — so runs can also be executed with
//! fresh allocators and renumbered afterwards (see `RunOutcome::shift_ids`).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StrategyId(pub u64);

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out 1-based, strictly increasing order and trade ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    issued_orders: u64,
    issued_trades: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_order_id(&mut self) -> OrderId {
        self.issued_orders += 1;
        OrderId(self.issued_orders)
    }

    pub fn next_trade_id(&mut self) -> TradeId {
        self.issued_trades += 1;
        TradeId(self.issued_trades)
    }

    /// Total order ids issued so far.
    pub fn issued_orders(&self) -> u64 {
        self.issued_orders
    }

    /// Total trade ids issued so far.
    pub fn issued_trades(&self) -> u64 {
        self.issued_trades
    }
}
