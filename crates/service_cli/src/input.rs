//! JSON input files.

use std::collections::HashMap;
use std::path::Path;

use hedge_core::types::PeriodKey;
use hedge_models::instruments::{HedgeParams, Overrides, StrategyLeg};
use hedge_risk::scenarios::{PriceRange, StrategyConfig};
use hedge_risk::SimulationConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{CliError, Result};

/// Input of `compute` and `payoff`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub params: HedgeParams,
    #[serde(default)]
    pub legs: Vec<StrategyLeg>,
    #[serde(default)]
    pub overrides: Overrides,
    /// Replaces the configured simulation settings.
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
}

/// Input of `risk`.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskFile {
    pub params: HedgeParams,
    pub strategies: Vec<StrategyConfig>,
    pub ranges: Vec<PriceRange>,
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
}

/// Input of `calibrate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalibrateFile {
    /// One observed price.
    Single {
        leg: StrategyLeg,
        spot: f64,
        /// Annual rate in percent.
        interest_rate: f64,
        /// Years to expiry.
        expiry: f64,
        price: f64,
    },
    /// Observed prices per period of a schedule.
    Schedule {
        params: HedgeParams,
        leg: StrategyLeg,
        observed: HashMap<PeriodKey, f64>,
        #[serde(default)]
        overrides: Overrides,
    },
}

/// Reads and parses a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedge_models::instruments::Horizon;

    #[test]
    fn test_scenario_file() {
        let scenario: ScenarioFile = serde_json::from_str(
            r#"{
                "params": {
                    "start_date": "2025-01-01",
                    "horizon": { "months": 12 },
                    "interest_rate": 2.0,
                    "total_volume": 1200000.0,
                    "spot_price": 1.1
                },
                "legs": [
                    {
                        "type": "put",
                        "strike": { "value": 97.0 },
                        "volatility": 9.0,
                        "quantity": 100.0
                    },
                    {
                        "type": "call-knockout",
                        "strike": { "value": 105.0 },
                        "volatility": 9.0,
                        "quantity": -100.0,
                        "barrier": { "value": 1.2, "unit": "absolute" }
                    }
                ],
                "overrides": { "realized_prices": { "2025-3": 1.05 } }
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.params.horizon, Horizon::Months(12));
        assert_eq!(scenario.legs.len(), 2);
        assert_eq!(scenario.legs[1].key(1), "1-call-knockout");
        assert_eq!(
            scenario.overrides.realized(&"2025-3".parse().unwrap()),
            Some(1.05)
        );
        assert!(scenario.simulation.is_none());
    }

    #[test]
    fn test_calibrate_file_modes() {
        let single: CalibrateFile = serde_json::from_str(
            r#"{
                "mode": "single",
                "leg": {
                    "type": "call",
                    "strike": { "value": 100.0 },
                    "volatility": 20.0,
                    "quantity": 100.0
                },
                "spot": 100.0, "interest_rate": 2.0, "expiry": 1.0, "price": 8.916
            }"#,
        )
        .unwrap();
        assert!(matches!(single, CalibrateFile::Single { expiry, .. } if expiry == 1.0));
    }

    #[test]
    fn test_missing_file() {
        let err = read_json::<RiskFile>(Path::new("no/such/file.json")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
