//! Root-finding and minimisation solvers.
//!
//! ## Available Solvers
//!
//! - [`NewtonRaphsonSolver`]: quadratic convergence using an explicit derivative,
//!   with a strict variant returning `SolverError` and a bounded best-effort variant
//! - [`GridSearch`]: derivative-free minimisation over a uniform grid
//!
//! ## Configuration
//!
//! [`SolverConfig`] carries the tolerance (default 1e-10) and the iteration cap
//! (default 100).

mod config;
mod grid_search;
mod newton_raphson;

pub use config::SolverConfig;
pub use grid_search::{GridPoint, GridSearch};
pub use newton_raphson::{BoundedRoot, NewtonRaphsonSolver};
