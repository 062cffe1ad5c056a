//! Offsetlab CLI — run offset-strategy sweeps against local price data.
//!
//! Commands:
//! - `sweep` — run a grid sweep from a TOML config or the default candidate sets
//! - `catalog` — run the built-in reference strategy set over QQQ/RITM

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use offsetlab_core::data::{CsvPriceSource, PriceSource};
use offsetlab_runner::{
    persist_sweep, reference_strategies, run_strategies, run_sweep, session_report,
    CsvResultStore, SessionManifest, SweepConfig, SweepSummary,
};

#[derive(Parser)]
#[command(name = "offsetlab", about = "Offsetlab CLI — limit-offset backtesting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a grid sweep and report the two best strategies.
    Sweep {
        /// Path to a TOML sweep config. Without it, the default candidate
        /// sets are used and --symbols/--start/--end are required.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols for the default candidate sets (e.g. QQQ RITM).
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD) for the default candidate sets.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD) for the default candidate sets.
        #[arg(long)]
        end: Option<String>,

        /// Directory of <SYMBOL>.csv price files.
        #[arg(long, default_value = "pricing_data")]
        prices: PathBuf,

        /// Output directory for result sessions.
        #[arg(long, default_value = "results")]
        output: PathBuf,
    },
    /// Run the built-in reference strategy set over QQQ and RITM.
    Catalog {
        /// Directory of <SYMBOL>.csv price files.
        #[arg(long, default_value = "pricing_data")]
        prices: PathBuf,

        /// Output directory for result sessions.
        #[arg(long, default_value = "results")]
        output: PathBuf,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = "1999-05-01")]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long, default_value = "2023-05-01")]
        end: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sweep {
            config,
            symbols,
            start,
            end,
            prices,
            output,
        } => run_sweep_cmd(config, symbols, start, end, prices, output),
        Commands::Catalog {
            prices,
            output,
            start,
            end,
        } => run_catalog_cmd(prices, output, &start, &end),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

fn run_sweep_cmd(
    config: Option<PathBuf>,
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    prices: PathBuf,
    output: PathBuf,
) -> Result<()> {
    let config = match config {
        Some(path) => SweepConfig::from_toml_file(&path)
            .with_context(|| format!("loading sweep config {}", path.display()))?,
        None => {
            if symbols.is_empty() {
                bail!("either --config or --symbols with --start/--end is required");
            }
            let (Some(start), Some(end)) = (start, end) else {
                bail!("--start and --end are required without --config");
            };
            SweepConfig::default_candidates(symbols, parse_date(&start)?, parse_date(&end)?)
        }
    };

    let source = CsvPriceSource::new(prices);
    let summary = run_sweep(&config, &source)?;
    let store = persist_session(&output, &config, &summary)?;
    std::fs::write(
        store.session_dir().join("summary.md"),
        session_report(&config, &summary),
    )?;

    print_winners(&summary);
    println!("session written to {}", store.session_dir().display());
    Ok(())
}

fn run_catalog_cmd(prices: PathBuf, output: PathBuf, start: &str, end: &str) -> Result<()> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    let strategies = reference_strategies(start, end);

    let source = CsvPriceSource::new(prices);
    let mut price_map = BTreeMap::new();
    for symbol in ["QQQ", "RITM"] {
        price_map.insert(symbol.to_string(), source.load(symbol)?);
    }

    let runs = run_strategies(&strategies, &price_map, 10_000.0)?;
    let summary = SweepSummary {
        best_ending: offsetlab_runner::best_ending_balance(&runs),
        best_anytime: offsetlab_runner::best_anytime_balance(&runs),
        runs,
    };

    let mut store = CsvResultStore::create(&output);
    persist_sweep(&mut store, &summary)?;
    store.write_manifest(&SessionManifest {
        session: store.session().to_string(),
        config_id: "reference-set".into(),
        combinations: summary.runs.len(),
        best_ending: summary.best_ending.clone(),
        best_anytime: summary.best_anytime.clone(),
    })?;

    print_winners(&summary);
    println!("session written to {}", store.session_dir().display());
    Ok(())
}

fn persist_session(
    output: &PathBuf,
    config: &SweepConfig,
    summary: &SweepSummary,
) -> Result<CsvResultStore> {
    let mut store = CsvResultStore::create(output);
    persist_sweep(&mut store, summary)?;
    store.write_manifest(&SessionManifest {
        session: store.session().to_string(),
        config_id: config.config_id(),
        combinations: config.grid_size(),
        best_ending: summary.best_ending.clone(),
        best_anytime: summary.best_anytime.clone(),
    })?;
    Ok(store)
}

fn print_winners(summary: &SweepSummary) {
    match &summary.best_ending {
        Some(best) => println!(
            "best ending balance:  strategy {} at {:.6}",
            best.strategy_id, best.total
        ),
        None => println!("best ending balance:  no runs"),
    }
    match &summary.best_anytime {
        Some(best) => println!(
            "best anytime balance: strategy {} at {:.6}",
            best.strategy_id, best.total
        ),
        None => println!("best anytime balance: no runs"),
    }
}
