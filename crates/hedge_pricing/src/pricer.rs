//! Per-leg option pricing.
//!
//! [`OptionPricer`] routes each leg to the cheapest method that can price it:
//!
//! | Leg | `ClosedForm` | `MonteCarlo` |
//! |-----|--------------|--------------|
//! | vanilla call/put | Black-Scholes | Black-Scholes |
//! | single barrier (standard or reverse) | Haug reflection formulas | path kernel |
//! | double barrier | path kernel | path kernel |
//!
//! Swap legs carry no optionality and are rejected; their price comes from the
//! forward schedule.

use hedge_core::types::PricingError;
use hedge_models::analytical::{
    barrier_price, BarrierParams, BlackScholes, KnockType, OptionType,
};
use hedge_models::instruments::ResolvedLeg;
use tracing::debug;

use crate::mc::{
    price_barrier, BarrierContract, CancellationToken, GbmParams, MonteCarloConfig, PathSet,
    PathSimulator, Trigger,
};

/// Preferred pricing method for barrier legs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PricingMethod {
    /// Closed form where one exists, Monte Carlo otherwise.
    #[default]
    ClosedForm,
    /// Monte Carlo for every barrier leg.
    MonteCarlo,
}

/// Prices strategy legs.
///
/// # Examples
///
/// ```rust
/// use hedge_models::instruments::{LegType, Level, StrategyLeg};
/// use hedge_pricing::{OptionPricer, PricingMethod};
///
/// let leg = StrategyLeg::new(LegType::CALL, Level::percent(100.0), 20.0, 100.0)
///     .resolve(100.0)
///     .unwrap();
/// let pricer = OptionPricer::default();
/// let price = pricer
///     .price(&leg, 100.0, 100.0, 0.02, 1.0, 0.2, PricingMethod::ClosedForm, None)
///     .unwrap();
/// assert!((price - 8.916).abs() < 1e-3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OptionPricer {
    simulator: PathSimulator,
}

impl OptionPricer {
    /// Creates a pricer whose Monte Carlo fallback uses `config`.
    pub fn new(config: MonteCarloConfig) -> Self {
        Self {
            simulator: PathSimulator::new(config),
        }
    }

    /// Monte Carlo configuration.
    pub fn config(&self) -> &MonteCarloConfig {
        self.simulator.config()
    }

    /// Prices `leg` at `strike` for spot `spot`, rate `rate`, expiry `t`
    /// years and decimal volatility `sigma`.
    ///
    /// `paths` are reused for Monte Carlo when they were generated with the
    /// same rate and volatility and reach `t`; otherwise a fresh ensemble is
    /// simulated from the pricer's configuration.
    ///
    /// # Errors
    ///
    /// - `PricingError::InvalidInput` for non-positive spot, strike or
    ///   volatility, negative expiry, or a barrier leg without valid levels
    /// - `PricingError::UnsupportedInstrument` for swap legs
    #[allow(clippy::too_many_arguments)]
    pub fn price(
        &self,
        leg: &ResolvedLeg,
        spot: f64,
        strike: f64,
        rate: f64,
        t: f64,
        sigma: f64,
        method: PricingMethod,
        paths: Option<&PathSet>,
    ) -> Result<f64, PricingError> {
        self.price_with_cancel(
            leg,
            spot,
            strike,
            rate,
            t,
            sigma,
            method,
            paths,
            &CancellationToken::never(),
        )
    }

    /// As [`OptionPricer::price`], aborting Monte Carlo work once `token` is cancelled.
    #[allow(clippy::too_many_arguments)]
    pub fn price_with_cancel(
        &self,
        leg: &ResolvedLeg,
        spot: f64,
        strike: f64,
        rate: f64,
        t: f64,
        sigma: f64,
        method: PricingMethod,
        paths: Option<&PathSet>,
        token: &CancellationToken,
    ) -> Result<f64, PricingError> {
        validate_inputs(spot, strike, rate, t, sigma)?;
        let option_type = leg.leg_type.option_type().ok_or_else(|| {
            PricingError::UnsupportedInstrument(format!(
                "{} has no option price; swaps are priced from forwards",
                leg.leg_type
            ))
        })?;

        if !leg.leg_type.is_barrier() {
            return vanilla(option_type, spot, strike, rate, t, sigma);
        }

        let contract = BarrierContract::from_leg(leg, strike).ok_or_else(|| {
            PricingError::invalid(format!("{} requires barrier levels", leg.leg_type))
        })?;
        validate_trigger(&contract.trigger)?;

        if t == 0.0 {
            return Ok(gated_intrinsic(&contract, spot));
        }

        match (method, contract.trigger) {
            (PricingMethod::ClosedForm, Trigger::Single { direction, level }) => {
                let params = BarrierParams {
                    spot,
                    strike,
                    barrier: level,
                    rate,
                    volatility: sigma,
                    expiry: t,
                };
                Ok(barrier_price(option_type, direction, contract.knock, &params)?)
            }
            (method, _) => {
                if method == PricingMethod::ClosedForm {
                    debug!(leg = %leg.leg_type, "no closed form, falling back to Monte Carlo");
                }
                self.monte_carlo(&contract, spot, rate, t, sigma, paths, token)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn monte_carlo(
        &self,
        contract: &BarrierContract,
        spot: f64,
        rate: f64,
        t: f64,
        sigma: f64,
        paths: Option<&PathSet>,
        token: &CancellationToken,
    ) -> Result<f64, PricingError> {
        let config = self.simulator.config();
        let owned;
        let paths = match paths {
            Some(p) if p.is_compatible(rate, sigma, t) => p,
            _ => {
                let params = GbmParams {
                    spot,
                    rate,
                    volatility: sigma,
                    horizon: t,
                };
                owned = self
                    .simulator
                    .generate_with_cancel(config.n_paths(), params, &[], token)?;
                &owned
            }
        };
        Ok(price_barrier(
            paths,
            contract,
            spot,
            rate,
            t,
            config.monitoring(),
            config.batch_size(),
            token,
        )?)
    }
}

fn validate_inputs(
    spot: f64,
    strike: f64,
    rate: f64,
    t: f64,
    sigma: f64,
) -> Result<(), PricingError> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(PricingError::invalid(format!("spot must be positive, got {spot}")));
    }
    if !(strike.is_finite() && strike > 0.0) {
        return Err(PricingError::invalid(format!("strike must be positive, got {strike}")));
    }
    if !rate.is_finite() {
        return Err(PricingError::invalid(format!("rate must be finite, got {rate}")));
    }
    if !(t.is_finite() && t >= 0.0) {
        return Err(PricingError::invalid(format!(
            "time to maturity must be non-negative, got {t}"
        )));
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(PricingError::invalid(format!(
            "volatility must be positive, got {sigma}"
        )));
    }
    Ok(())
}

fn validate_trigger(trigger: &Trigger) -> Result<(), PricingError> {
    let levels = match *trigger {
        Trigger::Single { level, .. } => [level, level],
        Trigger::Corridor { lower, upper } => [lower, upper],
    };
    match levels.iter().find(|h| !(h.is_finite() && **h > 0.0)) {
        Some(h) => Err(PricingError::invalid(format!("barrier must be positive, got {h}"))),
        None => Ok(()),
    }
}

fn vanilla(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    t: f64,
    sigma: f64,
) -> Result<f64, PricingError> {
    let bs = BlackScholes::new(spot, rate, sigma)?;
    Ok(bs.price(option_type, strike, t))
}

/// Intrinsic value at expiry, knocked by the spot alone.
fn gated_intrinsic(contract: &BarrierContract, spot: f64) -> f64 {
    let intrinsic = contract.option_type.intrinsic(spot, contract.strike);
    let touched = contract.trigger.is_touched(spot);
    match (contract.knock, touched) {
        (KnockType::Out, false) | (KnockType::In, true) => intrinsic,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::PricingMethod::{ClosedForm, MonteCarlo};
    use super::*;
    use approx::assert_relative_eq;
    use hedge_models::instruments::{LegType, Level, StrategyLeg};

    fn leg(tag: &str, barrier: Option<f64>, second: Option<f64>) -> ResolvedLeg {
        let leg_type = tag.parse::<LegType>().unwrap();
        let mut l = StrategyLeg::new(leg_type, Level::absolute(100.0), 20.0, 100.0);
        if let Some(h) = barrier {
            l = l.with_barriers(Level::absolute(h), second.map(Level::absolute));
        }
        l.resolve(100.0).unwrap()
    }

    fn small_pricer() -> OptionPricer {
        let config = MonteCarloConfig::builder()
            .n_paths(5_000)
            .seed(11)
            .build()
            .unwrap();
        OptionPricer::new(config)
    }

    #[test]
    fn test_vanilla_reference() {
        let p = OptionPricer::default();
        let l = leg("call", None, None);
        let call = p
            .price(&l, 100.0, 100.0, 0.02, 1.0, 0.2, ClosedForm, None)
            .unwrap();
        assert_relative_eq!(call, 8.916, epsilon = 1e-3);
    }

    #[test]
    fn test_vanilla_ignores_method() {
        let p = OptionPricer::default();
        let l = leg("put", None, None);
        let a = p
            .price(&l, 100.0, 105.0, 0.02, 0.5, 0.15, ClosedForm, None)
            .unwrap();
        let b = p
            .price(&l, 100.0, 105.0, 0.02, 0.5, 0.15, MonteCarlo, None)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reverse_knockout_closed_form() {
        let p = OptionPricer::default();
        let l = leg("call-reverse-knockout", Some(90.0), None);
        let v = p
            .price(&l, 100.0, 100.0, 0.02, 1.0, 0.2, ClosedForm, None)
            .unwrap();
        assert_relative_eq!(v, 7.3004, epsilon = 1e-3);
    }

    #[test]
    fn test_double_barrier_falls_back() {
        let p = small_pricer();
        let l = leg("call-double-knockout", Some(130.0), Some(80.0));
        let closed = p
            .price(&l, 100.0, 100.0, 0.02, 1.0, 0.2, ClosedForm, None)
            .unwrap();
        let mc = p
            .price(&l, 100.0, 100.0, 0.02, 1.0, 0.2, MonteCarlo, None)
            .unwrap();
        assert_eq!(closed, mc);
        assert!(closed > 0.0 && closed < 8.916);
    }

    #[test]
    fn test_expired_barrier_is_gated_intrinsic() {
        let p = OptionPricer::default();
        let ko = leg("call-knockout", Some(110.0), None);
        let ki = leg("call-knockin", Some(110.0), None);
        let price = |l: &ResolvedLeg, s: f64| {
            p.price(l, s, 100.0, 0.02, 0.0, 0.2, ClosedForm, None)
                .unwrap()
        };
        assert_relative_eq!(price(&ko, 105.0), 5.0);
        assert_eq!(price(&ko, 112.0), 0.0);
        assert_eq!(price(&ki, 105.0), 0.0);
        assert_relative_eq!(price(&ki, 112.0), 12.0);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let p = OptionPricer::default();
        let l = leg("call", None, None);
        for (s, k, t, sigma) in [
            (0.0, 100.0, 1.0, 0.2),
            (100.0, -1.0, 1.0, 0.2),
            (100.0, 100.0, -0.1, 0.2),
            (100.0, 100.0, 1.0, 0.0),
            (f64::NAN, 100.0, 1.0, 0.2),
        ] {
            assert!(matches!(
                p.price(&l, s, k, 0.02, t, sigma, ClosedForm, None),
                Err(PricingError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_swap_is_unsupported() {
        let p = OptionPricer::default();
        let swap = StrategyLeg::new(LegType::SWAP, Level::percent(100.0), 0.0, 100.0)
            .resolve(100.0)
            .unwrap();
        assert!(matches!(
            p.price(&swap, 100.0, 100.0, 0.02, 1.0, 0.2, ClosedForm, None),
            Err(PricingError::UnsupportedInstrument(_))
        ));
    }

    #[test]
    fn test_reuses_compatible_paths() {
        let p = small_pricer();
        let paths = PathSimulator::new(MonteCarloConfig::builder().seed(99).build().unwrap())
            .generate(3_000, 1.0, 100.0, 0.02, 0.2, &[])
            .unwrap();
        let l = leg("put-knockout", Some(85.0), None);
        let with = p
            .price(&l, 100.0, 100.0, 0.02, 1.0, 0.2, MonteCarlo, Some(&paths))
            .unwrap();
        let contract = BarrierContract::from_leg(&l, 100.0).unwrap();
        let direct = price_barrier(
            &paths,
            &contract,
            100.0,
            0.02,
            1.0,
            p.config().monitoring(),
            p.config().batch_size(),
            &CancellationToken::never(),
        )
        .unwrap();
        assert_eq!(with, direct);

        // Different volatility: the supplied paths are ignored.
        let other = p
            .price(&l, 100.0, 100.0, 0.02, 1.0, 0.3, MonteCarlo, Some(&paths))
            .unwrap();
        let fresh = p
            .price(&l, 100.0, 100.0, 0.02, 1.0, 0.3, MonteCarlo, None)
            .unwrap();
        assert_eq!(other, fresh);
    }

    #[test]
    fn test_cancelled_token() {
        let p = small_pricer();
        let token = CancellationToken::never();
        token.cancel();
        let l = leg("call-double-knockin", Some(120.0), Some(80.0));
        let err = p
            .price_with_cancel(&l, 100.0, 100.0, 0.02, 1.0, 0.2, ClosedForm, None, &token)
            .unwrap_err();
        assert_eq!(err, PricingError::Cancelled);
    }
}
