//! Offsetlab core — engine, domain types, ledger, day processor, simulation driver.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, strategies, orders, trades, ids)
//! - The append-only balance ledger
//! - The six-step day processor that matches orders against a daily bar
//! - The simulation driver that walks a strategy across its date window
//! - CSV price loading and a seeded synthetic bar generator

pub mod data;
pub mod domain;
pub mod engine;
pub mod ledger;
