//! Volatility calibration.
//!
//! - [`VolatilityCalibrator`]: single observations and per-period schedules
//! - [`CalibrationError`]: rejected observations and failed scans

mod error;
mod implied_vol;

pub use error::CalibrationError;
pub use implied_vol::{
    CalibrationMethod, ImpliedVolatility, VolatilityCalibrator, GRID_LOWER, GRID_STEPS,
    GRID_UPPER, INITIAL_VOLATILITY, MAX_ITERATIONS, MAX_VOLATILITY, MIN_VOLATILITY,
    PRICE_TOLERANCE,
};
