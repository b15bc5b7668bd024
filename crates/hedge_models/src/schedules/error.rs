//! Schedule construction errors.

use chrono::NaiveDate;
use hedge_core::types::PricingError;
use thiserror::Error;

/// Errors raised while expanding hedge parameters into periods.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    /// Zero months or an empty custom period list.
    #[error("hedge horizon has no periods")]
    EmptyHorizon,

    /// Negative or non-finite volume.
    #[error("invalid volume {volume}")]
    InvalidVolume {
        /// The rejected volume
        volume: f64,
    },

    /// Spot price not strictly positive.
    #[error("invalid spot price {spot}")]
    InvalidSpot {
        /// The rejected spot
        spot: f64,
    },

    /// Non-finite interest rate.
    #[error("invalid interest rate {rate}%")]
    InvalidRate {
        /// The rejected rate in percent
        rate: f64,
    },

    /// A custom period matures before the start date.
    #[error("maturity {maturity} precedes start date {start}")]
    MaturityBeforeStart {
        /// Offending maturity
        maturity: NaiveDate,
        /// Hedge start date
        start: NaiveDate,
    },

    /// Month arithmetic ran past the supported calendar.
    #[error("maturity date out of range")]
    DateOverflow,
}

impl From<ScheduleError> for PricingError {
    fn from(err: ScheduleError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
