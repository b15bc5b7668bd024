//! # hedge_pricing: Path Simulation and Leg Pricing
//!
//! ## Layer 3 (Engine) Role
//!
//! - `rng`: seeded generator and replaceable shock distributions
//! - `mc`: GBM path simulation, the Monte Carlo barrier kernel and
//!   cooperative cancellation
//! - `pricer`: [`OptionPricer`], dispatching each leg to Black-Scholes, the
//!   closed-form barrier formulas or Monte Carlo
//!
//! Path batches run on the rayon pool. Every batch seeds its own generator
//! from `(seed, batch index)`, so results do not depend on the thread count.

#![deny(missing_docs)]

pub mod mc;
pub mod pricer;
pub mod rng;

pub use pricer::{OptionPricer, PricingMethod};
