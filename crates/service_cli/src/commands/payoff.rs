//! Payoff command implementation

use std::fmt::Write as _;
use std::path::Path;

use hedge_risk::valuation::PayoffPoint;
use tracing::info;

use crate::config::CliConfig;
use crate::input::{read_json, ScenarioFile};
use crate::output::{emit, render, OutputFormat};
use crate::Result;

/// Run the payoff command
pub fn run(
    config: &CliConfig,
    input: &Path,
    points: usize,
    width: f64,
    format: OutputFormat,
) -> Result<()> {
    info!("Building payoff diagram...");
    let scenario: ScenarioFile = read_json(input)?;
    let engine = super::engine(config, scenario.simulation)?;
    let diagram = engine.payoff_diagram(&scenario.params, &scenario.legs, width, points)?;
    let text = render(&diagram, format, |d| table(d))?;
    emit(&text, None)
}

fn table(points: &[PayoffPoint]) -> String {
    let mut out = format!("{:>12} {:>12}", "Price", "Payoff");
    for p in points {
        let _ = write!(out, "\n{:>12.5} {:>12.5}", p.price, p.payoff);
    }
    out
}
