//! # Monte Carlo Engine
//!
//! - [`paths`]: GBM ensembles with per-period step indices
//! - [`barrier`]: barrier-leg kernel with discrete or Brownian-bridge monitoring
//! - [`cancel`]: generation-counter cancellation shared by both
//!
//! ## Usage Example
//!
//! ```rust
//! use hedge_pricing::mc::{MonteCarloConfig, PathSimulator};
//!
//! let config = MonteCarloConfig::builder().n_paths(2_000).seed(7).build().unwrap();
//! let sim = PathSimulator::new(config);
//! let paths = sim.generate(config.n_paths(), 0.5, 1.1, 0.02, 0.12, &[0.25, 0.5]).unwrap();
//! assert_eq!(paths.n_paths(), 2_000);
//! assert_eq!(paths.monthly_indices().len(), 2);
//! ```

pub mod barrier;
pub mod cancel;
pub mod config;
pub mod error;
pub mod paths;

pub use barrier::{price_barrier, BarrierContract, Trigger};
pub use cancel::{CancellationToken, RecomputeGate};
pub use config::{
    BarrierMonitoring, MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_BATCH_SIZE,
    DEFAULT_SEED, MAX_PATHS,
};
pub use error::SimulationError;
pub use paths::{step_count, GbmParams, PathSet, PathSimulator, MIN_STEPS, STEPS_PER_YEAR};
