//! Calibrate command implementation
//!
//! Inverts observed option prices into implied volatilities.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::config::CliConfig;
use crate::input::{read_json, CalibrateFile};
use crate::output::emit;
use crate::{CliError, Result};

/// Run the calibrate command
pub fn run(config: &CliConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    info!("Starting calibration...");
    let file: CalibrateFile = read_json(input)?;
    let engine = super::engine(config, None)?;

    let text = match file {
        CalibrateFile::Single {
            leg,
            spot,
            interest_rate,
            expiry,
            price,
        } => {
            let resolved = leg.resolve(spot)?;
            let iv = engine
                .calibrator()
                .implied_volatility(
                    &resolved,
                    spot,
                    resolved.strike,
                    interest_rate / 100.0,
                    expiry,
                    price,
                )?
                .ok_or_else(|| {
                    CliError::InvalidArgument(format!("{} has no volatility", leg.leg_type))
                })?;
            if !iv.converged {
                warn!(residual = iv.residual, "calibration did not converge");
            }
            serde_json::to_string_pretty(&iv)?
        }
        CalibrateFile::Schedule {
            params,
            leg,
            observed,
            overrides,
        } => {
            let vols = engine.calibrate(&params, &leg, &observed, &overrides)?;
            info!("Calibrated {} of {} periods", vols.len(), observed.len());
            // Ordered by period for stable output.
            let ordered: BTreeMap<_, _> = vols.into_iter().collect();
            serde_json::to_string_pretty(&ordered)?
        }
    };

    emit(&text, output)?;
    info!("Calibration complete");
    Ok(())
}
