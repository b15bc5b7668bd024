//! Error types for analytical pricing.

use hedge_core::types::PricingError;
use thiserror::Error;

/// Analytical pricing errors.
///
/// # Examples
/// ```
/// use hedge_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(err.to_string().contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Volatility not strictly positive or not finite.
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The rejected volatility
        volatility: f64,
    },

    /// Spot not strictly positive or not finite.
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The rejected spot
        spot: f64,
    },

    /// Strike not strictly positive or not finite.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The rejected strike
        strike: f64,
    },

    /// Barrier not strictly positive or not finite.
    #[error("Invalid barrier: H = {barrier}")]
    InvalidBarrier {
        /// The rejected barrier
        barrier: f64,
    },

    /// Negative or non-finite time to expiry.
    #[error("Invalid expiry: t = {expiry}")]
    InvalidExpiry {
        /// The rejected expiry
        expiry: f64,
    },

    /// Interest rate not finite.
    #[error("Invalid rate: r = {rate}")]
    InvalidRate {
        /// The rejected rate
        rate: f64,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AnalyticalError::InvalidSpot { spot: -100.0 };
        assert_eq!(err.to_string(), "Invalid spot price: S = -100");
        let err = AnalyticalError::InvalidExpiry { expiry: -0.5 };
        assert_eq!(err.to_string(), "Invalid expiry: t = -0.5");
    }

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = AnalyticalError::InvalidVolatility { volatility: 0.0 }.into();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }
}
