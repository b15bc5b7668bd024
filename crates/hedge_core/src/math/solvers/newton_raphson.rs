//! Newton-Raphson root finding.

use super::SolverConfig;
use crate::types::SolverError;

/// Derivatives smaller than this abort the iteration.
const MIN_DERIVATIVE: f64 = 1e-12;

/// Outcome of a best-effort bounded search.
///
/// `x` is the iterate with the smallest `|f(x)|` seen, not necessarily the last.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedRoot {
    /// Best iterate.
    pub x: f64,
    /// `f(x)` at the best iterate.
    pub residual: f64,
    /// Function evaluations performed.
    pub iterations: usize,
    /// Whether `|residual| < tolerance`.
    pub converged: bool,
}

/// Newton-Raphson root finder.
///
/// Uses `x_{n+1} = x_n - f(x_n) / f'(x_n)`, converging quadratically near a
/// simple root.
///
/// # Example
///
/// ```
/// use hedge_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
/// let root = solver.find_root(|x| x * x - 2.0, |x| 2.0 * x, 1.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver {
    config: SolverConfig,
}

impl NewtonRaphsonSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Creates a solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a root of `f` given its derivative `f_prime`.
    ///
    /// # Errors
    ///
    /// * `SolverError::DerivativeNearZero` when `|f'(x)|` collapses
    /// * `SolverError::NumericalInstability` when an iterate is not finite
    /// * `SolverError::MaxIterationsExceeded` when the iteration cap is hit
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: f64) -> Result<f64, SolverError>
    where
        F: Fn(f64) -> f64,
        G: Fn(f64) -> f64,
    {
        let mut x = x0;
        for _ in 0..self.config.max_iterations {
            let fx = f(x);
            if fx.abs() < self.config.tolerance {
                return Ok(x);
            }
            let dfx = f_prime(x);
            if dfx.abs() < MIN_DERIVATIVE {
                return Err(SolverError::DerivativeNearZero { x });
            }
            x -= fx / dfx;
            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                ));
            }
        }
        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Best-effort Newton iteration with every iterate clamped to `[lower, upper]`.
    ///
    /// Never fails: hitting the iteration cap, a vanishing derivative or a
    /// non-finite step ends the search and the best iterate is returned with
    /// `converged = false`.
    pub fn find_root_bounded<F, G>(
        &self,
        f: F,
        f_prime: G,
        x0: f64,
        lower: f64,
        upper: f64,
    ) -> BoundedRoot
    where
        F: Fn(f64) -> f64,
        G: Fn(f64) -> f64,
    {
        let mut x = x0.clamp(lower, upper);
        let mut best = BoundedRoot {
            x,
            residual: f64::INFINITY,
            iterations: 0,
            converged: false,
        };

        for iteration in 1..=self.config.max_iterations {
            let fx = f(x);
            best.iterations = iteration;
            if fx.is_finite() && fx.abs() < best.residual.abs() {
                best.x = x;
                best.residual = fx;
            }
            if fx.abs() < self.config.tolerance {
                best.converged = true;
                break;
            }

            let dfx = f_prime(x);
            if dfx.is_nan() || dfx.abs() < MIN_DERIVATIVE {
                break;
            }
            let next = x - fx / dfx;
            if !next.is_finite() {
                break;
            }
            x = next.clamp(lower, upper);
        }
        best
    }
}
