//! Caller-owned override maps keyed by period.

use std::collections::HashMap;

use hedge_core::types::{PeriodKey, PricingError};

/// Manual market inputs that replace computed values for specific periods.
///
/// The engine only reads these maps; callers persist and resupply them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Overrides {
    /// Forward price per period.
    pub forward_prices: HashMap<PeriodKey, f64>,
    /// Realized price per period.
    pub realized_prices: HashMap<PeriodKey, f64>,
    /// Implied volatility in percent per period.
    pub implied_volatilities: HashMap<PeriodKey, f64>,
    /// Option price per period and leg key (`"{index}-{tag}"`).
    pub custom_option_prices: HashMap<PeriodKey, HashMap<String, f64>>,
}

impl Overrides {
    /// Empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Manual forward for `key`.
    pub fn forward(&self, key: &PeriodKey) -> Option<f64> {
        self.forward_prices.get(key).copied()
    }

    /// Manual realized price for `key`.
    pub fn realized(&self, key: &PeriodKey) -> Option<f64> {
        self.realized_prices.get(key).copied()
    }

    /// Implied volatility in percent for `key`.
    pub fn implied_volatility(&self, key: &PeriodKey) -> Option<f64> {
        self.implied_volatilities.get(key).copied()
    }

    /// Custom option price for the leg identified by `leg_key` in period `key`.
    pub fn custom_price(&self, key: &PeriodKey, leg_key: &str) -> Option<f64> {
        self.custom_option_prices
            .get(key)
            .and_then(|m| m.get(leg_key))
            .copied()
    }

    /// Rejects values no period could settle or price at.
    ///
    /// Forwards, realized prices and implied volatilities must be finite and
    /// positive; custom option prices finite and non-negative.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` naming the first offending entry found.
    pub fn validate(&self) -> Result<(), PricingError> {
        let positive = [
            ("forward price", &self.forward_prices),
            ("realized price", &self.realized_prices),
            ("implied volatility", &self.implied_volatilities),
        ];
        for (what, map) in positive {
            let bad = map.iter().find(|(_, v)| !(v.is_finite() && **v > 0.0));
            if let Some((key, value)) = bad {
                return Err(PricingError::invalid(format!(
                    "{what} override for {key} must be finite and positive, got {value}"
                )));
            }
        }
        for (key, prices) in &self.custom_option_prices {
            let bad = prices.iter().find(|(_, v)| !(v.is_finite() && **v >= 0.0));
            if let Some((leg, value)) = bad {
                return Err(PricingError::invalid(format!(
                    "custom price for {leg} in {key} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        self.forward_prices.is_empty()
            && self.realized_prices.is_empty()
            && self.implied_volatilities.is_empty()
            && self.custom_option_prices.values().all(HashMap::is_empty)
    }
}
