//! Monte Carlo configuration.

use super::error::SimulationError;
use crate::rng::ShockModel;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Paths per rayon task.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Default seed when none is supplied.
pub const DEFAULT_SEED: u64 = 42;

/// How barrier touches are detected along a simulated path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BarrierMonitoring {
    /// Touch checked only at simulated steps.
    Discrete,
    /// Steps checked as in `Discrete`, and each path is additionally weighted
    /// by the probability that the log-price bridge between consecutive steps
    /// stayed clear of the barrier.
    #[default]
    BrownianBridge,
}

/// Immutable Monte Carlo configuration.
///
/// # Examples
///
/// ```rust
/// use hedge_pricing::mc::{BarrierMonitoring, MonteCarloConfig};
/// use hedge_pricing::rng::ShockModel;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(20_000)
///     .seed(7)
///     .shock(ShockModel::LegacyUniform)
///     .monitoring(BarrierMonitoring::Discrete)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 20_000);
/// assert_eq!(config.seed(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonteCarloConfig {
    n_paths: usize,
    seed: u64,
    shock: ShockModel,
    monitoring: BarrierMonitoring,
    batch_size: usize,
}

impl Default for MonteCarloConfig {
    /// 10,000 Gaussian paths, seed 42, Brownian-bridge monitoring.
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            seed: DEFAULT_SEED,
            shock: ShockModel::Gaussian,
            monitoring: BarrierMonitoring::BrownianBridge,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shock distribution.
    #[inline]
    pub fn shock(&self) -> ShockModel {
        self.shock
    }

    /// Barrier monitoring mode.
    #[inline]
    pub fn monitoring(&self) -> BarrierMonitoring {
        self.monitoring
    }

    /// Paths per parallel batch.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Copy with a different path count, validated.
    pub fn with_paths(&self, n_paths: usize) -> Result<Self, SimulationError> {
        let config = Self { n_paths, ..*self };
        config.validate()?;
        Ok(config)
    }

    /// Copy with a different seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self { seed, ..*self }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `n_paths` is 0 or greater than [`MAX_PATHS`]
    /// - `batch_size` is 0
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(SimulationError::InvalidPathCount(self.n_paths));
        }
        if self.batch_size == 0 {
            return Err(SimulationError::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`], validated at build time.
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    seed: Option<u64>,
    shock: ShockModel,
    monitoring: BarrierMonitoring,
    batch_size: Option<usize>,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of paths, in `[1, MAX_PATHS]`.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the base seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the shock distribution.
    #[inline]
    pub fn shock(mut self, shock: ShockModel) -> Self {
        self.shock = shock;
        self
    }

    /// Sets the barrier monitoring mode.
    #[inline]
    pub fn monitoring(mut self, monitoring: BarrierMonitoring) -> Self {
        self.monitoring = monitoring;
        self
    }

    /// Sets the number of paths per parallel batch.
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<MonteCarloConfig, SimulationError> {
        let defaults = MonteCarloConfig::default();
        let config = MonteCarloConfig {
            n_paths: self.n_paths.unwrap_or(defaults.n_paths),
            seed: self.seed.unwrap_or(defaults.seed),
            shock: self.shock,
            monitoring: self.monitoring,
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let c = MonteCarloConfig::builder().build().unwrap();
        assert_eq!(c, MonteCarloConfig::default());
        assert_eq!(c.monitoring(), BarrierMonitoring::BrownianBridge);
    }

    #[test]
    fn test_builder_rejects_zero_paths() {
        assert_eq!(
            MonteCarloConfig::builder().n_paths(0).build(),
            Err(SimulationError::InvalidPathCount(0))
        );
        assert_eq!(
            MonteCarloConfig::builder().n_paths(MAX_PATHS + 1).build(),
            Err(SimulationError::InvalidPathCount(MAX_PATHS + 1))
        );
        assert_eq!(
            MonteCarloConfig::builder().batch_size(0).build(),
            Err(SimulationError::InvalidBatchSize(0))
        );
    }

    #[test]
    fn test_with_paths_and_seed() {
        let c = MonteCarloConfig::default();
        assert_eq!(c.with_paths(500).unwrap().n_paths(), 500);
        assert!(c.with_paths(0).is_err());
        assert_eq!(c.with_seed(9).seed(), 9);
    }
}
