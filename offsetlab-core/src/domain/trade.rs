//! Trade records — one per executed order, immutable once created.

use super::ids::{OrderId, TradeId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The execution that settles an order.
///
/// `price` is the actual fill price, which may improve on the order's limit
/// when the day opens through it. `total` is `shares × price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub order_id: OrderId,
    pub shares: u64,
    pub date: NaiveDate,
    pub price: f64,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = Trade {
            id: TradeId(7),
            order_id: OrderId(3),
            shares: 110,
            date: NaiveDate::from_ymd_opt(2023, 4, 11).unwrap(),
            price: 9.025,
            total: 992.75,
        };
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
