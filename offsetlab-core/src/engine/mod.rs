//! Engine — per-day order matching and the run driver.

pub mod day;
pub mod driver;

pub use driver::{run_strategy, RunOutcome};
