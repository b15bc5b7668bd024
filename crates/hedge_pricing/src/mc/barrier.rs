//! Monte Carlo kernel for barrier legs.
//!
//! Each path is walked from the valuation step to the maturity step. A path
//! whose price meets the barrier condition at any step is knocked. Under
//! [`BarrierMonitoring::BrownianBridge`] an unknocked path additionally
//! carries the probability that the continuous log-price bridge between two
//! steps stayed clear of the barrier:
//!
//! `p_survive = 1 − exp(−2·ln(S_i/H)·ln(S_{i+1}/H) / (σ²·dt))`
//!
//! Knock-outs pay `survival · payoff` and knock-ins `(1 − survival) · payoff`,
//! so in-out parity holds path by path.

use hedge_models::analytical::{BarrierDirection, KnockType, OptionType};
use hedge_models::instruments::ResolvedLeg;
use rayon::prelude::*;

use super::cancel::CancellationToken;
use super::config::BarrierMonitoring;
use super::error::SimulationError;
use super::paths::PathSet;

/// Barrier trigger geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    /// Single barrier on one side of spot.
    Single {
        /// Side of the barrier.
        direction: BarrierDirection,
        /// Barrier level.
        level: f64,
    },
    /// Corridor; triggers strictly outside `[lower, upper]`.
    Corridor {
        /// Lower level.
        lower: f64,
        /// Upper level.
        upper: f64,
    },
}

impl Trigger {
    /// Whether `price` meets the trigger condition.
    #[inline]
    pub fn is_touched(&self, price: f64) -> bool {
        match *self {
            Trigger::Single { direction, level } => direction.is_breached(price, level),
            Trigger::Corridor { lower, upper } => price < lower || price > upper,
        }
    }

    /// Probability the bridge from `a` to `b` avoids the trigger, both ends unknocked.
    #[inline]
    fn bridge_survival(&self, a: f64, b: f64, var_dt: f64) -> f64 {
        let single = |level: f64| {
            let prod = (a / level).ln() * (b / level).ln();
            if prod <= 0.0 {
                0.0
            } else {
                1.0 - (-2.0 * prod / var_dt).exp()
            }
        };
        match *self {
            Trigger::Single { level, .. } => single(level),
            Trigger::Corridor { lower, upper } => single(lower) * single(upper),
        }
    }
}

/// Contract terms of a barrier leg at a given strike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarrierContract {
    /// Call or put payoff.
    pub option_type: OptionType,
    /// In or out.
    pub knock: KnockType,
    /// Trigger geometry.
    pub trigger: Trigger,
    /// Strike.
    pub strike: f64,
}

impl BarrierContract {
    /// Builds the contract for `leg` struck at `strike`; `None` for non-barrier legs.
    pub fn from_leg(leg: &ResolvedLeg, strike: f64) -> Option<Self> {
        let option_type = leg.leg_type.option_type()?;
        let knock = leg.leg_type.knock_type()?;
        let trigger = match (leg.leg_type.barrier_direction(), leg.corridor()) {
            (Some(direction), _) => Trigger::Single {
                direction,
                level: leg.barrier?,
            },
            (None, Some((lower, upper))) => Trigger::Corridor { lower, upper },
            (None, None) => return None,
        };
        Some(Self {
            option_type,
            knock,
            trigger,
            strike,
        })
    }

    /// Payoff of one path (unscaled prices multiplied by `scale`) up to `maturity`.
    #[inline]
    fn path_payoff(&self, path: &[f64], scale: f64, maturity: usize, bridge: Option<f64>) -> f64 {
        let mut survival = 1.0;
        let mut prev = path[0] * scale;
        if self.trigger.is_touched(prev) {
            survival = 0.0;
        } else {
            for &raw in &path[1..=maturity] {
                let s = raw * scale;
                if self.trigger.is_touched(s) {
                    survival = 0.0;
                    break;
                }
                if let Some(var_dt) = bridge {
                    survival *= self.trigger.bridge_survival(prev, s, var_dt);
                }
                prev = s;
            }
        }

        let payoff = self.option_type.intrinsic(path[maturity] * scale, self.strike);
        match self.knock {
            KnockType::Out => survival * payoff,
            KnockType::In => (1.0 - survival) * payoff,
        }
    }
}

/// Discounted Monte Carlo price of `contract` over `paths`.
///
/// Paths are rescaled from their generation spot to `spot`; the maturity
/// step is the one nearest `expiry`. Batches of `batch_size` paths are priced
/// in parallel and `token` is polled between them.
#[allow(clippy::too_many_arguments)]
pub fn price_barrier(
    paths: &PathSet,
    contract: &BarrierContract,
    spot: f64,
    rate: f64,
    expiry: f64,
    monitoring: BarrierMonitoring,
    batch_size: usize,
    token: &CancellationToken,
) -> Result<f64, SimulationError> {
    if batch_size == 0 {
        return Err(SimulationError::InvalidBatchSize(batch_size));
    }
    let scale = spot / paths.params().spot;
    let maturity = paths.step_for_time(expiry);
    let vol = paths.params().volatility;
    let var_dt = vol * vol * paths.dt();
    let bridge = match monitoring {
        BarrierMonitoring::BrownianBridge if var_dt > 0.0 => Some(var_dt),
        _ => None,
    };

    let total: f64 = paths
        .paths()
        .collect::<Vec<_>>()
        .par_chunks(batch_size)
        .map(|batch| {
            token.check()?;
            Ok(batch
                .iter()
                .map(|path| contract.path_payoff(path, scale, maturity, bridge))
                .sum::<f64>())
        })
        .collect::<Result<Vec<f64>, SimulationError>>()?
        .into_iter()
        .sum();

    let mean = total / paths.n_paths() as f64;
    Ok(((-rate * expiry).exp() * mean).max(0.0))
}
