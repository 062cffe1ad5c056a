//! Markdown session reports.

use crate::config::SweepConfig;
use crate::optimizer::{StrategyBalance, SweepSummary};

/// Generate a Markdown summary for a finished sweep.
pub fn session_report(config: &SweepConfig, summary: &SweepSummary) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Sweep Report\n\n");

    md.push_str("## Configuration\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbols | {} |\n", config.symbols.join(", ")));
    md.push_str(&format!(
        "| Window | {} to {} |\n",
        config.start_date, config.end_date
    ));
    md.push_str(&format!("| Combinations | {} |\n", config.grid_size()));
    md.push_str(&format!("| Order duration | {} days |\n", config.order_duration));
    md.push_str(&format!(
        "| Starting balance | ${:.2} |\n",
        config.starting_balance
    ));
    md.push_str(&format!("| Config id | {} |\n", config.config_id()));
    md.push('\n');

    md.push_str("## Best strategies\n\n");
    md.push_str(&format_winner(
        "Largest ending balance",
        summary.best_ending.as_ref(),
        summary,
    ));
    md.push_str(&format_winner(
        "Largest anytime balance",
        summary.best_anytime.as_ref(),
        summary,
    ));

    md
}

fn format_winner(label: &str, winner: Option<&StrategyBalance>, summary: &SweepSummary) -> String {
    let Some(winner) = winner else {
        return format!("- **{label}**: no runs\n");
    };
    let params = summary
        .runs
        .iter()
        .find(|r| r.strategy.id == winner.strategy_id)
        .map(|r| {
            format!(
                "{} buy×{} sell×{} ratio {}",
                r.strategy.symbol,
                r.strategy.buy_offset,
                r.strategy.sell_offset,
                r.strategy.order_amount_ratio
            )
        })
        .unwrap_or_default();
    format!(
        "- **{label}**: strategy {} ({params}) — total ${:.6} on {}\n",
        winner.strategy_id, winner.total, winner.snapshot.date
    )
}
