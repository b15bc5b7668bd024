//! Shock distributions driving the GBM step.
//!
//! `Gaussian` draws a true standard normal. `LegacyUniform` draws uniformly on
//! [-1, 1]; it has variance 1/3 and thin tails, and exists only to reproduce
//! results saved by older tooling.

use super::PricerRng;

/// Source of the per-step shock `Z`.
pub trait ShockGenerator {
    /// Draws one shock.
    fn sample(&self, rng: &mut PricerRng) -> f64;

    /// Fills `buffer` with shocks.
    fn fill(&self, rng: &mut PricerRng, buffer: &mut [f64]) {
        for z in buffer.iter_mut() {
            *z = self.sample(rng);
        }
    }
}

/// Built-in shock distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShockModel {
    /// Standard normal.
    #[default]
    Gaussian,
    /// Uniform on [-1, 1].
    LegacyUniform,
}

impl ShockGenerator for ShockModel {
    #[inline]
    fn sample(&self, rng: &mut PricerRng) -> f64 {
        match self {
            ShockModel::Gaussian => rng.gen_normal(),
            ShockModel::LegacyUniform => 2.0 * rng.gen_uniform() - 1.0,
        }
    }

    fn fill(&self, rng: &mut PricerRng, buffer: &mut [f64]) {
        match self {
            ShockModel::Gaussian => rng.fill_normal(buffer),
            ShockModel::LegacyUniform => {
                for z in buffer.iter_mut() {
                    *z = 2.0 * rng.gen_uniform() - 1.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_uniform_bounds_and_variance() {
        let mut rng = PricerRng::from_seed(3);
        let mut buf = vec![0.0; 60_000];
        ShockModel::LegacyUniform.fill(&mut rng, &mut buf);
        assert!(buf.iter().all(|z| (-1.0..1.0).contains(z)));
        let var = buf.iter().map(|z| z * z).sum::<f64>() / buf.len() as f64;
        assert!((var - 1.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_gaussian_is_default() {
        assert_eq!(ShockModel::default(), ShockModel::Gaussian);
    }

    #[test]
    fn test_sample_and_fill_agree() {
        let mut a = PricerRng::from_seed(5);
        let mut b = PricerRng::from_seed(5);
        let mut buf = [0.0; 4];
        ShockModel::Gaussian.fill(&mut a, &mut buf);
        for z in buf {
            assert_eq!(z, ShockModel::Gaussian.sample(&mut b));
        }
    }
}
