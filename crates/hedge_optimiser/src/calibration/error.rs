//! Calibration error types.

use hedge_core::types::PricingError;
use thiserror::Error;

/// Errors raised before or after a calibration search.
///
/// Non-convergence is not an error: the best candidate is returned with
/// `converged = false`.
///
/// # Examples
///
/// ```
/// use hedge_optimiser::calibration::CalibrationError;
///
/// let err = CalibrationError::InvalidObservation { price: -1.0 };
/// assert!(err.to_string().contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Observed price negative or not finite.
    #[error("Observed option price must be a non-negative number, got {price}")]
    InvalidObservation {
        /// The rejected price
        price: f64,
    },

    /// Expiry not strictly positive; an expired option carries no volatility.
    #[error("Cannot calibrate at expiry {expiry}: time to maturity must be positive")]
    InvalidExpiry {
        /// The rejected expiry
        expiry: f64,
    },

    /// Every grid candidate failed to price.
    #[error("No volatility candidate in [{lower}, {upper}] produced a finite price")]
    NoFiniteCandidate {
        /// Lower end of the searched range
        lower: f64,
        /// Upper end of the searched range
        upper: f64,
    },
}

impl From<CalibrationError> for PricingError {
    fn from(err: CalibrationError) -> Self {
        match err {
            CalibrationError::NoFiniteCandidate { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_pricing_error() {
        assert!(matches!(
            PricingError::from(CalibrationError::InvalidExpiry { expiry: 0.0 }),
            PricingError::InvalidInput(_)
        ));
        assert!(matches!(
            PricingError::from(CalibrationError::NoFiniteCandidate {
                lower: 0.01,
                upper: 1.0
            }),
            PricingError::NumericalInstability(_)
        ));
    }
}
