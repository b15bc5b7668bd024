//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: top-level error surfaced by every pricing operation
//! - `SolverError`: errors from root-finding and grid solvers
//!
//! Layer-specific errors in the upper crates convert into `PricingError`
//! through `From` so that `?` composes across layers.

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidInput`: a parameter that would feed NaN or a division by zero into a formula
/// - `NumericalInstability`: a computation produced a non-finite value
/// - `UnsupportedInstrument`: a leg the requested operation cannot handle
/// - `Cancelled`: the computation was superseded by a newer request
///
/// Unsupported closed forms and calibration non-convergence are deliberately
/// absent: the former falls back to Monte Carlo, the latter returns the best
/// candidate.
///
/// # Examples
/// ```
/// use hedge_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("negative volatility".to_string());
/// assert_eq!(err.to_string(), "Invalid input: negative volatility");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Instrument not supported by the requested operation.
    #[error("Unsupported instrument: {0}")]
    UnsupportedInstrument(String),

    /// Computation superseded before completion.
    #[error("Computation cancelled")]
    Cancelled,
}

impl PricingError {
    /// Shorthand for [`PricingError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        PricingError::InvalidInput(msg.into())
    }
}

/// Root-finding solver errors.
///
/// # Examples
/// ```
/// use hedge_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(err.to_string().contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero in a Newton step.
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where the derivative vanished
        x: f64,
    },

    /// Search interval is empty or not finite.
    #[error("No bracket: [{a}, {b}] is not a valid search interval")]
    NoBracket {
        /// Left endpoint
        a: f64,
        /// Right endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        PricingError::NumericalInstability(err.to_string())
    }
}
