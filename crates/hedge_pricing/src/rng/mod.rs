//! # Random Number Generation
//!
//! - [`prng`]: seeded generator with per-batch stream derivation
//! - [`shock`]: replaceable shock distributions for the GBM step
//!
//! ## Usage Example
//!
//! ```rust
//! use hedge_pricing::rng::{PricerRng, ShockGenerator, ShockModel};
//!
//! let mut rng = PricerRng::for_stream(42, 3);
//! let z = ShockModel::Gaussian.sample(&mut rng);
//! assert!(z.is_finite());
//! ```

pub mod prng;
pub mod shock;

pub use prng::{derive_seed, PricerRng};
pub use shock::{ShockGenerator, ShockModel};
