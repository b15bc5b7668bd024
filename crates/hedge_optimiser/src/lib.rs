//! # hedge_optimiser
//!
//! Implied volatility calibration for FX hedge legs.
//!
//! ## Architecture Position
//!
//! Layer 3 alongside `hedge_pricing`, which it uses as the forward model.
//! Depends on `hedge_core` (L1 solvers) and `hedge_models` (L2 legs and
//! schedules).
//!
//! ## Modules
//!
//! - `calibration`: Newton-Raphson for vanilla legs, grid search for barrier
//!   legs, per-period calibration into an override map
//!
//! ## Feature Flags
//!
//! - `parallel` (default): calibrate schedule periods on the rayon pool
//! - `serde` (default): serialisable calibration results
//!
//! ## Example
//!
//! ```rust
//! use hedge_models::instruments::{LegType, Level, StrategyLeg};
//! use hedge_optimiser::calibration::VolatilityCalibrator;
//!
//! let swap = StrategyLeg::new(LegType::SWAP, Level::percent(100.0), 0.0, 100.0)
//!     .resolve(1.1)
//!     .unwrap();
//! let iv = VolatilityCalibrator::default()
//!     .implied_volatility(&swap, 1.1, 1.1, 0.02, 1.0, 0.0)
//!     .unwrap();
//! assert!(iv.is_none());
//! ```

#![deny(missing_docs)]

pub mod calibration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::calibration::*;
}
