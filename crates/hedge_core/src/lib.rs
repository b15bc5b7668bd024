//! # hedge_core: Numerical Foundation for FX Hedge Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! hedge_core is the bottom layer of the hedge kernel, providing:
//! - Standard normal distribution functions (`math::distributions`)
//! - Root-finding and grid-search solvers (`math::solvers`)
//! - Error types: `PricingError`, `SolverError` (`types::error`)
//! - Period keys and day-count helpers (`types::period_key`, `types::time`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other hedge_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use hedge_core::math::distributions::norm_cdf;
//! use hedge_core::types::PeriodKey;
//! use chrono::NaiveDate;
//!
//! let p = norm_cdf(0.0_f64);
//! assert!((p - 0.5).abs() < 1e-7);
//!
//! let key = PeriodKey::from_date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
//! assert_eq!(key.as_str(), "2025-3");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for error and key types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod math;
pub mod types;
