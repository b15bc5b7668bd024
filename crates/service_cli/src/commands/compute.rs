//! Compute command implementation
//!
//! Runs a full hedge computation over a scenario file.

use std::fmt::Write as _;
use std::path::Path;

use hedge_risk::HedgeResults;
use tracing::info;

use crate::config::CliConfig;
use crate::input::{read_json, ScenarioFile};
use crate::output::{emit, percent_or_na, render, OutputFormat};
use crate::Result;

/// Run the compute command
pub fn run(
    config: &CliConfig,
    input: &Path,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    info!("Starting hedge computation...");
    info!("  Scenario: {}", input.display());

    let scenario: ScenarioFile = read_json(input)?;
    let engine = super::engine(config, scenario.simulation)?;
    let results = engine.compute(&scenario.params, &scenario.legs, &scenario.overrides)?;

    let text = render(&results, format, table)?;
    emit(&text, output)?;
    info!("Computation complete");
    Ok(())
}

fn table(results: &HedgeResults) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>14} {:>14} {:>12}",
        "Maturity", "Forward", "Realized", "Strategy", "Payoff", "Hedged", "Unhedged", "ΔP&L"
    );
    for p in &results.periods {
        let _ = writeln!(
            out,
            "{:<10} {:>10.5} {:>10.5} {:>10.5} {:>10.5} {:>14.2} {:>14.2} {:>12.2}",
            p.date.format("%Y-%m-%d"),
            p.forward,
            p.realized,
            p.strategy_price,
            p.total_payoff,
            p.hedged_cost,
            p.unhedged_cost,
            p.delta_pnl
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<10} {:>14} {:>14} {:>12} {:>14} {:>10}",
        "Year", "Hedged", "Unhedged", "ΔP&L", "Premium", "Reduction"
    );
    for y in &results.yearly {
        let _ = writeln!(
            out,
            "{:<10} {:>14.2} {:>14.2} {:>12.2} {:>14.2} {:>10}",
            y.year,
            y.costs.hedged_cost,
            y.costs.unhedged_cost,
            y.costs.delta_pnl,
            y.costs.strategy_premium,
            percent_or_na(y.costs.cost_reduction())
        );
    }
    let t = &results.total;
    let _ = write!(
        out,
        "{:<10} {:>14.2} {:>14.2} {:>12.2} {:>14.2} {:>10}",
        "Total",
        t.hedged_cost,
        t.unhedged_cost,
        t.delta_pnl,
        t.strategy_premium,
        percent_or_na(t.cost_reduction())
    );
    out
}
