//! Error types for the Monte Carlo engine.

use hedge_core::types::PricingError;
use thiserror::Error;

/// Monte Carlo configuration and runtime errors.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// Path count outside `[1, MAX_PATHS]`.
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),

    /// Batch size of zero.
    #[error("Invalid batch size {0}: must be positive")]
    InvalidBatchSize(usize),

    /// Market input unusable for simulation.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A newer computation superseded this one.
    #[error("Simulation cancelled")]
    Cancelled,
}

impl From<SimulationError> for PricingError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Cancelled => PricingError::Cancelled,
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}
