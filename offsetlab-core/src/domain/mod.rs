//! Domain types: bars, strategies, orders, trades, and id allocation.

pub mod bar;
pub mod ids;
pub mod order;
pub mod strategy;
pub mod trade;

pub use bar::Bar;
pub use ids::{IdAllocator, OrderId, StrategyId, TradeId};
pub use order::{Order, OrderKind, OrderStatus, Side};
pub use strategy::Strategy;
pub use trade::Trade;
