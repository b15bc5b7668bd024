//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod calibrate;
pub mod check;
pub mod compute;
pub mod payoff;
pub mod risk;

use hedge_risk::{HedgeEngine, SimulationConfig};

use crate::config::CliConfig;
use crate::Result;

/// Engine for a file's simulation block, or the configured defaults.
fn engine(config: &CliConfig, from_file: Option<SimulationConfig>) -> Result<HedgeEngine> {
    Ok(HedgeEngine::new(from_file.unwrap_or(config.simulation))?)
}
