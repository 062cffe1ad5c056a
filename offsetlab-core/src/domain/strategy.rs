//! Strategy parameters — immutable once constructed.

use super::ids::StrategyId;
use super::order::OrderKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Configuration of a single offset strategy over one symbol and date window.
///
/// `buy_offset` is the fraction of the close price at which a limit buy is
/// staged (typically ≤ 1). `sell_offset` is the fraction of the buy fill
/// price at which the paired limit sell is staged (typically ≥ 1).
/// `order_amount_ratio` is the fraction of the lesser of starting balance
/// and current cash committed to each new buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: StrategyId,
    pub name: String,
    pub description: String,
    pub buy_offset: f64,
    pub sell_offset: f64,
    /// How a cycle originates. Only limit entries are supported; market
    /// orders arise solely as a transition target for stale sells.
    pub entry_kind: OrderKind,
    /// Trading days before a pending order expires.
    pub order_duration: usize,
    pub order_amount_ratio: f64,
    pub symbol: String,
    /// Inclusive simulation window.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
