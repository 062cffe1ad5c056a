//! Serializable sweep configuration.

use chrono::NaiveDate;
use offsetlab_core::domain::{OrderKind, Strategy, StrategyId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating a sweep configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce one optimizer sweep.
///
/// The grid is the cross-product of `symbols × order_amount_ratios ×
/// buy_offsets × sell_offsets`; duration, window, and starting balance are
/// shared by every combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub symbols: Vec<String>,
    pub buy_offsets: Vec<f64>,
    pub sell_offsets: Vec<f64>,
    pub order_amount_ratios: Vec<f64>,
    pub order_duration: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,
}

fn default_starting_balance() -> f64 {
    10_000.0
}

impl SweepConfig {
    /// The stock candidate sets: buy offsets 0.90–0.99, sell offsets
    /// 1.01–1.10, ratios 0.05–0.20.
    pub fn default_candidates(
        symbols: Vec<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            symbols,
            buy_offsets: vec![0.90, 0.91, 0.92, 0.93, 0.94, 0.95, 0.96, 0.97, 0.98, 0.99],
            sell_offsets: vec![1.01, 1.02, 1.03, 1.04, 1.05, 1.06, 1.07, 1.08, 1.09, 1.10],
            order_amount_ratios: vec![0.05, 0.10, 0.15, 0.20],
            order_duration: 10,
            start_date,
            end_date,
            starting_balance: default_starting_balance(),
        }
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("no symbols configured".into()));
        }
        if self.buy_offsets.is_empty()
            || self.sell_offsets.is_empty()
            || self.order_amount_ratios.is_empty()
        {
            return Err(ConfigError::Invalid("empty candidate set".into()));
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::Invalid(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.order_amount_ratios.iter().any(|r| *r <= 0.0 || *r > 1.0) {
            return Err(ConfigError::Invalid(
                "order amount ratios must be in (0, 1]".into(),
            ));
        }
        if self.starting_balance <= 0.0 {
            return Err(ConfigError::Invalid(
                "starting balance must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Number of combinations in the grid.
    pub fn grid_size(&self) -> usize {
        self.symbols.len()
            * self.order_amount_ratios.len()
            * self.buy_offsets.len()
            * self.sell_offsets.len()
    }

    /// Materialize the grid as strategies, ids assigned sequentially in
    /// nesting order (symbol, ratio, buy offset, sell offset).
    pub fn strategies(&self) -> Vec<Strategy> {
        let mut strategies = Vec::with_capacity(self.grid_size());
        let mut next_id = 0u64;
        for symbol in &self.symbols {
            for &ratio in &self.order_amount_ratios {
                for &buy_offset in &self.buy_offsets {
                    for &sell_offset in &self.sell_offsets {
                        next_id += 1;
                        strategies.push(Strategy {
                            id: StrategyId(next_id),
                            name: "limit buy below close, limit sell above fill".into(),
                            description: format!(
                                "buy at close × {buy_offset}, then sell at fill × {sell_offset}; \
                                 orders expire after {} trading days",
                                self.order_duration
                            ),
                            buy_offset,
                            sell_offset,
                            entry_kind: OrderKind::Limit,
                            order_duration: self.order_duration,
                            order_amount_ratio: ratio,
                            symbol: symbol.clone(),
                            start_date: self.start_date,
                            end_date: self.end_date,
                        });
                    }
                }
            }
        }
        strategies
    }

    /// Deterministic content hash of this configuration. Two identical
    /// sweeps share an id, so sessions are attributable to their exact
    /// parameters.
    pub fn config_id(&self) -> String {
        let json = serde_json::to_string(self).expect("SweepConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
