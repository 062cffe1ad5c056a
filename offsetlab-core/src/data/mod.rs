//! Price data: CSV directory source and synthetic series generation.

pub mod csv_source;
pub mod synthetic;

pub use csv_source::{CsvPriceSource, DataError, PriceSource};
pub use synthetic::synthetic_bars;
