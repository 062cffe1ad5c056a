//! CSV price source — one `<SYMBOL>.csv` file per symbol in a directory.
//!
//! File format: a header row (discarded), then
//! `symbol,date,open,high,low,close` with ISO dates. Rows are sorted
//! ascending by date after loading. Empty or malformed files are
//! configuration errors and fail before any simulation day runs.

use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from price loading.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed price row in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no price rows for symbol '{0}'")]
    EmptySeries(String),

    #[error("no price file for symbol '{0}'")]
    UnknownSymbol(String),
}

/// Read-only supplier of per-symbol daily price series.
pub trait PriceSource {
    /// All symbols this source can serve.
    fn symbols(&self) -> Result<BTreeSet<String>, DataError>;

    /// The full series for one symbol, ascending by date, never empty.
    fn load(&self, symbol: &str) -> Result<Vec<Bar>, DataError>;
}

/// On-disk row shape. The bar's symbol column is carried through verbatim.
#[derive(Debug, Deserialize)]
struct PriceRow {
    symbol: String,
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl From<PriceRow> for Bar {
    fn from(row: PriceRow) -> Self {
        Bar {
            symbol: row.symbol,
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
        }
    }
}

/// Price source backed by a directory of `<SYMBOL>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceSource for CsvPriceSource {
    fn symbols(&self) -> Result<BTreeSet<String>, DataError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| DataError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut symbols = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|source| DataError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.insert(stem.to_string());
                }
            }
        }
        Ok(symbols)
    }

    fn load(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.symbol_path(symbol);
        if !path.exists() {
            return Err(DataError::UnknownSymbol(symbol.to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|source| DataError::Malformed {
                path: path.clone(),
                source,
            })?;

        let mut bars = Vec::new();
        for row in reader.deserialize::<PriceRow>() {
            let row = row.map_err(|source| DataError::Malformed {
                path: path.clone(),
                source,
            })?;
            bars.push(Bar::from(row));
        }

        if bars.is_empty() {
            return Err(DataError::EmptySeries(symbol.to_string()));
        }
        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }
}
