//! Core types: errors, period keys and day counts.

pub mod error;
pub mod period_key;
pub mod time;

pub use error::{PricingError, SolverError};
pub use period_key::PeriodKey;
