//! # hedge_risk
//!
//! Hedge valuation, barrier state tracking and scenario analysis.
//!
//! ## Architecture Position
//!
//! Layer 4, the application layer. Depends on `hedge_core`, `hedge_models`,
//! `hedge_pricing` and `hedge_optimiser`.
//!
//! ## Modules
//!
//! - `barrier_state`: absorbing knock state along the realized price series
//! - `valuation`: per-period strategy pricing, payoffs and summaries
//! - `scenarios`: probability-weighted risk matrix and coverage variations
//! - `engine`: [`HedgeEngine`], which runs a full computation with
//!   supersede-on-recompute cancellation
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hedge_models::instruments::{HedgeParams, Horizon, Overrides};
//! use hedge_risk::{HedgeEngine, SimulationConfig};
//!
//! let config = SimulationConfig { real_paths: 10, ..Default::default() };
//! let engine = HedgeEngine::new(config).unwrap();
//! let params = HedgeParams {
//!     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     horizon: Horizon::Months(6),
//!     interest_rate: 3.0,
//!     total_volume: 600_000.0,
//!     spot_price: 1.08,
//! };
//! let results = engine.compute(&params, &[], &Overrides::new()).unwrap();
//! assert_eq!(results.total.delta_pnl, 0.0);
//! assert_eq!(results.total.cost_reduction(), Some(0.0));
//! ```

#![deny(missing_docs)]

pub mod barrier_state;
pub mod engine;
pub mod error;
pub mod scenarios;
pub mod valuation;

pub use barrier_state::{BarrierStateTracker, BarrierStates};
pub use engine::{
    HedgeEngine, HedgeResults, RealizedPriceSource, SimulationConfig, SimulationData,
};
pub use error::RiskError;
