//! Order records and their lifecycle state machine.

use super::ids::{OrderId, StrategyId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// Execution discipline. A sell order transitions Limit → Market exactly
/// once, when it goes stale; it then fills unconditionally at the next open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

/// Order lifecycle states. `Filled` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Waiting to be filled or expired.
    Pending,
    /// Executed — a trade settles it.
    Filled,
    /// Went stale without executing; its reservation was released.
    Expired,
}

/// A single order in the book.
///
/// Orders are append-only within a run: they are never deleted, only moved
/// to a terminal status. `total` is computed once at creation
/// (`shares × price`) and is not recomputed on execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub strategy_id: StrategyId,
    pub symbol: String,
    pub shares: u64,
    pub side: Side,
    pub kind: OrderKind,
    /// First day the order is honored.
    pub open_date: NaiveDate,
    /// Last day the order is honored.
    pub close_date: NaiveDate,
    /// Limit price; meaningless once `kind` is `Market`.
    pub price: f64,
    pub total: f64,
    pub status: OrderStatus,
}

impl Order {
    /// Whether the order can still fill or expire.
    pub fn is_active(&self) -> bool {
        matches!(self.status, OrderStatus::Pending)
    }

    /// Terminal transition: executed.
    pub fn fill(&mut self) {
        debug_assert!(self.is_active(), "only a pending order can fill");
        self.status = OrderStatus::Filled;
    }

    /// Terminal transition: went stale without executing.
    pub fn expire(&mut self) {
        debug_assert!(self.is_active(), "only a pending order can expire");
        self.status = OrderStatus::Expired;
    }

    /// Stale-sell conversion: the order stays pending but will now fill
    /// unconditionally at the next open.
    pub fn convert_to_market(&mut self) {
        debug_assert!(self.is_active() && self.kind == OrderKind::Limit);
        self.kind = OrderKind::Market;
    }
}
