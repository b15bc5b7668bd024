//! Geometric Brownian motion path simulation.
//!
//! Each step applies the exact log-space GBM transition
//! `S_{t+dt} = S_t · exp((r − σ²/2)·dt + σ·√dt·Z)`.
//!
//! # Memory Layout
//!
//! Paths are stored row-major: `data[path_idx * (n_steps + 1) + step_idx]`,
//! where `step_idx = 0` holds the initial spot.

use rayon::prelude::*;
use tracing::debug;

use super::cancel::CancellationToken;
use super::config::MonteCarloConfig;
use super::error::SimulationError;
use crate::rng::{PricerRng, ShockGenerator};

/// Simulation steps per year.
pub const STEPS_PER_YEAR: f64 = 252.0;

/// Floor on the number of steps.
pub const MIN_STEPS: usize = 50;

/// Number of steps for a horizon: `max(round(252·T), 50)`.
///
/// Non-positive and non-finite horizons get the floor.
pub fn step_count(horizon: f64) -> usize {
    if horizon.is_finite() && horizon > 0.0 {
        ((STEPS_PER_YEAR * horizon).round() as usize).max(MIN_STEPS)
    } else {
        MIN_STEPS
    }
}

/// Market inputs of one GBM ensemble.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Initial spot (S₀).
    pub spot: f64,
    /// Continuously compounded rate, used as the drift.
    pub rate: f64,
    /// Volatility; zero gives deterministic paths.
    pub volatility: f64,
    /// Simulated horizon in years.
    pub horizon: f64,
}

impl GbmParams {
    /// Checks that the inputs yield finite, positive paths.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "spot",
                value: self.spot,
            });
        }
        if !self.rate.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "rate",
                value: self.rate,
            });
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "volatility",
                value: self.volatility,
            });
        }
        if !self.horizon.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "horizon",
                value: self.horizon,
            });
        }
        Ok(())
    }
}

/// Immutable ensemble of simulated paths.
#[derive(Clone, Debug)]
pub struct PathSet {
    params: GbmParams,
    n_paths: usize,
    n_steps: usize,
    dt: f64,
    data: Vec<f64>,
    monthly_indices: Vec<usize>,
}

impl PathSet {
    /// Number of paths.
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of steps; each path holds `n_steps + 1` prices.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Step length in years.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Inputs the ensemble was generated with.
    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    /// Step index of each requested period time.
    pub fn monthly_indices(&self) -> &[usize] {
        &self.monthly_indices
    }

    /// Prices of path `index`.
    ///
    /// # Panics
    ///
    /// If `index >= n_paths()`.
    pub fn path(&self, index: usize) -> &[f64] {
        let width = self.n_steps + 1;
        &self.data[index * width..(index + 1) * width]
    }

    /// All paths in order.
    pub fn paths(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.n_steps + 1)
    }

    /// Nearest step to time `t`, clamped to `[0, n_steps]`.
    pub fn step_for_time(&self, t: f64) -> usize {
        if self.dt <= 0.0 || t.is_nan() || t <= 0.0 {
            return 0;
        }
        ((t / self.dt).round() as usize).min(self.n_steps)
    }

    /// Whether these paths can price an option of expiry `t` under `rate` and `volatility`.
    pub fn is_compatible(&self, rate: f64, volatility: f64, t: f64) -> bool {
        const TOL: f64 = 1e-12;
        (self.params.rate - rate).abs() < TOL
            && (self.params.volatility - volatility).abs() < TOL
            && t <= self.params.horizon.max(0.0) + 0.5 * self.dt
    }
}

/// Generates GBM ensembles in parallel path batches.
///
/// # Examples
///
/// ```rust
/// use hedge_pricing::mc::{MonteCarloConfig, PathSimulator};
///
/// let sim = PathSimulator::new(MonteCarloConfig::default());
/// let paths = sim.generate(1_000, 1.0, 1.1, 0.02, 0.1, &[0.25, 0.5, 1.0]).unwrap();
/// assert_eq!(paths.n_steps(), 252);
/// assert_eq!(paths.path(0)[0], 1.1);
/// assert_eq!(paths.monthly_indices(), &[63, 126, 252]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathSimulator {
    config: MonteCarloConfig,
}

impl PathSimulator {
    /// Creates a simulator; the path count of `config` is used by callers
    /// that do not pass their own.
    pub fn new(config: MonteCarloConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Simulates `num_paths` paths over `horizon` years.
    ///
    /// `period_times` are mapped to the nearest step by proportional time
    /// fraction and exposed as [`PathSet::monthly_indices`].
    pub fn generate(
        &self,
        num_paths: usize,
        horizon: f64,
        spot: f64,
        rate: f64,
        volatility: f64,
        period_times: &[f64],
    ) -> Result<PathSet, SimulationError> {
        self.generate_with_cancel(
            num_paths,
            GbmParams {
                spot,
                rate,
                volatility,
                horizon,
            },
            period_times,
            &CancellationToken::never(),
        )
    }

    /// As [`PathSimulator::generate`], polling `token` between batches.
    pub fn generate_with_cancel(
        &self,
        num_paths: usize,
        params: GbmParams,
        period_times: &[f64],
        token: &CancellationToken,
    ) -> Result<PathSet, SimulationError> {
        self.config.with_paths(num_paths)?;
        params.validate()?;

        let n_steps = step_count(params.horizon);
        let horizon = params.horizon.max(0.0);
        let dt = horizon / n_steps as f64;
        let drift = (params.rate - 0.5 * params.volatility * params.volatility) * dt;
        let diffusion = params.volatility * dt.sqrt();
        let width = n_steps + 1;
        let batch = self.config.batch_size();
        let seed = self.config.seed();
        let shock = self.config.shock();

        debug!(
            num_paths,
            n_steps,
            batch,
            volatility = params.volatility,
            "generating GBM paths"
        );

        let mut data = vec![0.0; num_paths * width];
        data.par_chunks_mut(batch * width)
            .enumerate()
            .try_for_each(|(batch_idx, chunk)| {
                token.check()?;
                let mut rng = PricerRng::for_stream(seed, batch_idx as u64);
                let mut shocks = vec![0.0; n_steps];
                for row in chunk.chunks_exact_mut(width) {
                    shock.fill(&mut rng, &mut shocks);
                    let mut s = params.spot;
                    row[0] = s;
                    for (slot, z) in row[1..].iter_mut().zip(&shocks) {
                        s *= (drift + diffusion * z).exp();
                        *slot = s;
                    }
                }
                Ok::<(), SimulationError>(())
            })?;
        token.check()?;

        let monthly_indices = period_times
            .iter()
            .map(|&t| {
                if horizon > 0.0 && t > 0.0 {
                    ((t / horizon * n_steps as f64).round() as usize).min(n_steps)
                } else {
                    0
                }
            })
            .collect();

        Ok(PathSet {
            params,
            n_paths: num_paths,
            n_steps,
            dt,
            data,
            monthly_indices,
        })
    }
}
