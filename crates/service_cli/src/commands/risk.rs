//! Risk command implementation
//!
//! Evaluates the risk matrix of a set of strategy configurations.

use std::fmt::Write as _;
use std::path::Path;

use hedge_risk::scenarios::{coverage_variations, RiskMatrixResult};
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::input::{read_json, RiskFile};
use crate::output::{emit, render, OutputFormat};
use crate::Result;

#[derive(Serialize)]
struct RiskReport {
    results: Vec<RiskMatrixResult>,
    coverage_variations: Vec<Vec<RiskMatrixResult>>,
}

/// Run the risk command
pub fn run(
    config: &CliConfig,
    input: &Path,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    info!("Starting risk matrix...");
    let file: RiskFile = read_json(input)?;
    let engine = super::engine(config, file.simulation)?;
    let results = engine.risk_matrix(&file.params, &file.strategies, &file.ranges)?;
    let report = RiskReport {
        coverage_variations: results.iter().filter_map(coverage_variations).collect(),
        results,
    };

    let text = render(&report, format, |r| table(&r.results))?;
    emit(&text, output)?;
    info!("Risk matrix complete");
    Ok(())
}

fn table(results: &[RiskMatrixResult]) -> String {
    let mut out = String::new();
    let Some(first) = results.first() else {
        return "(no strategies)".to_string();
    };

    let _ = write!(out, "{:<20} {:>8} {:>14}", "Strategy", "Cover", "Cost");
    for o in &first.outcomes {
        let label = format!("{:.4}-{:.4}", o.range.min, o.range.max);
        let _ = write!(out, " {label:>14}");
    }
    let _ = writeln!(out, " {:>14}", "Expected");

    for r in results {
        let _ = write!(
            out,
            "{:<20} {:>7.0}% {:>14.2}",
            r.strategy, r.coverage_ratio, r.hedging_cost
        );
        for o in &r.outcomes {
            let _ = write!(out, " {:>14.2}", o.difference);
        }
        let ev = r
            .expected_value
            .map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
        let _ = writeln!(out, " {ev:>14}");
    }
    out.trim_end().to_string()
}
