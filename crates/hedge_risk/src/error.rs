//! Risk-layer input errors.

use hedge_core::types::PricingError;
use thiserror::Error;

/// Invalid scenario or engine configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// Range bounds not finite, negative or reversed.
    #[error("Invalid price range [{min}, {max}]: bounds must be non-negative with min <= max")]
    InvalidPriceRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Negative or non-finite scenario probability.
    #[error("Invalid scenario probability {0}: must be a non-negative percentage")]
    InvalidProbability(f64),

    /// Coverage ratio outside `[0, 100]`.
    #[error("Invalid coverage ratio {0}: must be in [0, 100]")]
    InvalidCoverage(f64),

    /// Simulation path count outside `[1, MAX_PATHS]`.
    #[error("Invalid {name} path count {value}: must be in range [1, 10_000_000]")]
    InvalidPathCount {
        /// Which simulation the count belongs to.
        name: &'static str,
        /// Offending count.
        value: usize,
    },

    /// Real-price volatility not a positive percentage.
    #[error("Invalid real-price volatility {0}: must be a positive percentage")]
    InvalidVolatility(f64),
}

impl From<RiskError> for PricingError {
    fn from(err: RiskError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = RiskError::InvalidCoverage(120.0).into();
        assert!(matches!(err, PricingError::InvalidInput(ref m) if m.contains("120")));
    }
}
