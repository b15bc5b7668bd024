//! # hedge_models: Strategy Definitions and Closed-Form Models
//!
//! ## Layer 2 (Business Logic) Role
//!
//! - `analytical`: Black-Scholes and single-barrier reflection formulas
//! - `instruments`: strategy legs, hedge parameters and override maps
//! - `schedules`: expansion of hedge parameters into dated periods
//!
//! Depends only on hedge_core. Pricing engines that need random paths live in
//! hedge_pricing.

#![deny(missing_docs)]

pub mod analytical;
pub mod instruments;
pub mod schedules;
