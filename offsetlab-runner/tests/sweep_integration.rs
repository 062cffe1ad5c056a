//! End-to-end sweep: CSV prices in, CSV session out.

use offsetlab_core::data::CsvPriceSource;
use offsetlab_runner::store::read_table;
use offsetlab_runner::{persist_sweep, run_sweep, CsvResultStore, SessionManifest, SweepConfig};
use std::io::Write;
use std::path::Path;

const PRICES: &str = "\
symbol,date,open,high,low,close
QQQ,2023-04-10,10,10,9,9.5
QQQ,2023-04-11,9.6,9.8,9.4,9.7
QQQ,2023-04-12,9.7,10,9.6,10
QQQ,2023-04-13,9.2,9.4,9.0,9.3
QQQ,2023-04-14,9.5,9.9,9.4,9.8
QQQ,2023-04-17,10.2,10.5,10.1,10.4
";

fn write_prices(dir: &Path) {
    let mut file = std::fs::File::create(dir.join("QQQ.csv")).unwrap();
    file.write_all(PRICES.as_bytes()).unwrap();
}

fn small_config() -> SweepConfig {
    SweepConfig {
        symbols: vec!["QQQ".into()],
        buy_offsets: vec![0.95, 0.97],
        sell_offsets: vec![1.02, 1.10],
        order_amount_ratios: vec![0.1, 0.2],
        order_duration: 3,
        start_date: chrono::NaiveDate::from_ymd_opt(2023, 4, 10).unwrap(),
        end_date: chrono::NaiveDate::from_ymd_opt(2023, 4, 17).unwrap(),
        starting_balance: 10_000.0,
    }
}

#[test]
fn sweep_runs_every_combination_and_persists_a_session() {
    let price_dir = tempfile::tempdir().unwrap();
    write_prices(price_dir.path());
    let source = CsvPriceSource::new(price_dir.path());

    let config = small_config();
    let summary = run_sweep(&config, &source).unwrap();
    assert_eq!(summary.runs.len(), config.grid_size());
    assert!(summary.best_ending.is_some());
    assert!(summary.best_anytime.is_some());

    // anytime can never be beaten by ending
    let ending = summary.best_ending.as_ref().unwrap();
    let anytime = summary.best_anytime.as_ref().unwrap();
    assert!(anytime.total >= ending.total);

    let out_dir = tempfile::tempdir().unwrap();
    let mut store = CsvResultStore::with_session(out_dir.path(), "it-session");
    persist_sweep(&mut store, &summary).unwrap();
    store
        .write_manifest(&SessionManifest {
            session: store.session().to_string(),
            config_id: config.config_id(),
            combinations: config.grid_size(),
            best_ending: summary.best_ending.clone(),
            best_anytime: summary.best_anytime.clone(),
        })
        .unwrap();

    let session = store.session_dir();
    for table in ["strategies", "orders", "balances"] {
        assert!(session.join(format!("{table}.csv")).exists(), "{table} missing");
    }
    assert!(session.join("manifest.json").exists());

    // one strategy row per combination
    let strategies = read_table(&session, "strategies").unwrap();
    assert_eq!(strategies.lines().count(), config.grid_size() + 1);

    // every balance row belongs to a known strategy id
    let balances = read_table(&session, "balances").unwrap();
    assert!(balances.lines().count() > config.grid_size());
}

#[test]
fn sweep_is_deterministic() {
    let price_dir = tempfile::tempdir().unwrap();
    write_prices(price_dir.path());
    let source = CsvPriceSource::new(price_dir.path());
    let config = small_config();

    let first = run_sweep(&config, &source).unwrap();
    let second = run_sweep(&config, &source).unwrap();

    assert_eq!(first.runs.len(), second.runs.len());
    for (a, b) in first.runs.iter().zip(&second.runs) {
        assert_eq!(a.orders, b.orders);
        assert_eq!(a.trades, b.trades);
        assert_eq!(a.balances, b.balances);
    }
    assert_eq!(first.best_ending, second.best_ending);
    assert_eq!(first.best_anytime, second.best_anytime);
}

#[test]
fn order_ids_are_unique_across_the_whole_session() {
    let price_dir = tempfile::tempdir().unwrap();
    write_prices(price_dir.path());
    let source = CsvPriceSource::new(price_dir.path());

    let summary = run_sweep(&small_config(), &source).unwrap();

    let mut order_ids: Vec<u64> = summary
        .runs
        .iter()
        .flat_map(|r| r.orders.iter().map(|o| o.id.0))
        .collect();
    let total = order_ids.len();
    order_ids.sort_unstable();
    order_ids.dedup();
    assert_eq!(order_ids.len(), total, "duplicate order ids across runs");

    let mut trade_ids: Vec<u64> = summary
        .runs
        .iter()
        .flat_map(|r| r.trades.iter().map(|t| t.id.0))
        .collect();
    let total = trade_ids.len();
    trade_ids.sort_unstable();
    trade_ids.dedup();
    assert_eq!(trade_ids.len(), total, "duplicate trade ids across runs");
}
