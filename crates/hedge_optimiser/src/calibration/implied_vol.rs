//! Implied volatility from observed option prices.
//!
//! Vanilla legs are inverted with a clamped Newton-Raphson iteration on the
//! Black-Scholes price, using vega as the derivative. Barrier legs have no
//! usable vega across knock regimes, so a uniform grid over
//! `[0.01, 1.0]` is scanned through the leg pricer instead.

use std::collections::HashMap;

use hedge_core::math::solvers::{GridSearch, NewtonRaphsonSolver, SolverConfig};
use hedge_core::types::{PeriodKey, PricingError};
use hedge_models::analytical::{BlackScholes, OptionType};
use hedge_models::instruments::{Overrides, ResolvedLeg, StrategyLeg};
use hedge_models::schedules::HedgeSchedule;
use hedge_pricing::mc::CancellationToken;
use hedge_pricing::{OptionPricer, PricingMethod};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use super::error::CalibrationError;

/// Newton starting point.
pub const INITIAL_VOLATILITY: f64 = 0.20;

/// Price tolerance ending the Newton iteration.
pub const PRICE_TOLERANCE: f64 = 1e-4;

/// Newton iteration cap.
pub const MAX_ITERATIONS: usize = 100;

/// Newton iterates are clamped to `[MIN_VOLATILITY, MAX_VOLATILITY]`.
pub const MIN_VOLATILITY: f64 = 0.001;

/// Upper clamp of the Newton iterates.
pub const MAX_VOLATILITY: f64 = 1.0;

/// Lower end of the barrier grid.
pub const GRID_LOWER: f64 = 0.01;

/// Upper end of the barrier grid.
pub const GRID_UPPER: f64 = 1.0;

/// Grid intervals; the grid holds `GRID_STEPS + 1` points.
pub const GRID_STEPS: usize = 50;

/// Search used for a calibration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CalibrationMethod {
    /// Clamped Newton-Raphson on the vanilla price.
    NewtonRaphson,
    /// Uniform grid through the leg pricer.
    GridSearch,
}

/// Calibrated volatility with diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolatility {
    /// Volatility in percent.
    pub volatility: f64,
    /// Model price minus observed price at `volatility`.
    pub residual: f64,
    /// Pricer evaluations performed.
    pub iterations: usize,
    /// Whether the price tolerance was met; a completed grid scan always counts.
    pub converged: bool,
    /// Search used.
    pub method: CalibrationMethod,
}

impl ImpliedVolatility {
    /// Decimal volatility.
    pub fn decimal(&self) -> f64 {
        self.volatility / 100.0
    }
}

/// Inverts observed leg prices into implied volatilities.
///
/// # Examples
///
/// ```
/// use hedge_models::instruments::{LegType, Level, StrategyLeg};
/// use hedge_optimiser::calibration::VolatilityCalibrator;
///
/// let leg = StrategyLeg::new(LegType::CALL, Level::percent(100.0), 20.0, 100.0)
///     .resolve(100.0)
///     .unwrap();
/// let calibrator = VolatilityCalibrator::default();
/// let iv = calibrator
///     .implied_volatility(&leg, 100.0, 100.0, 0.02, 1.0, 8.916)
///     .unwrap()
///     .unwrap();
/// assert!((iv.volatility - 20.0).abs() < 0.01);
/// ```
#[derive(Clone, Debug)]
pub struct VolatilityCalibrator {
    pricer: OptionPricer,
    method: PricingMethod,
    newton: NewtonRaphsonSolver,
}

impl Default for VolatilityCalibrator {
    fn default() -> Self {
        Self::new(OptionPricer::default(), PricingMethod::ClosedForm)
    }
}

impl VolatilityCalibrator {
    /// Creates a calibrator pricing barrier candidates with `pricer` under `method`.
    pub fn new(pricer: OptionPricer, method: PricingMethod) -> Self {
        Self {
            pricer,
            method,
            newton: NewtonRaphsonSolver::new(SolverConfig::new(PRICE_TOLERANCE, MAX_ITERATIONS)),
        }
    }

    /// Leg pricer used as the forward model.
    pub fn pricer(&self) -> &OptionPricer {
        &self.pricer
    }

    /// Implied volatility of `leg` struck at `strike` given `observed` price.
    ///
    /// Returns `Ok(None)` for swap legs.
    ///
    /// # Errors
    ///
    /// - `PricingError::InvalidInput` for non-positive spot, strike or expiry,
    ///   or a negative observed price
    /// - `PricingError::NumericalInstability` if no grid candidate prices
    pub fn implied_volatility(
        &self,
        leg: &ResolvedLeg,
        spot: f64,
        strike: f64,
        rate: f64,
        t: f64,
        observed: f64,
    ) -> Result<Option<ImpliedVolatility>, PricingError> {
        self.implied_volatility_with_cancel(
            leg,
            spot,
            strike,
            rate,
            t,
            observed,
            &CancellationToken::never(),
        )
    }

    /// As [`VolatilityCalibrator::implied_volatility`], abandoning the grid
    /// scan once `token` is cancelled.
    #[allow(clippy::too_many_arguments)]
    pub fn implied_volatility_with_cancel(
        &self,
        leg: &ResolvedLeg,
        spot: f64,
        strike: f64,
        rate: f64,
        t: f64,
        observed: f64,
        token: &CancellationToken,
    ) -> Result<Option<ImpliedVolatility>, PricingError> {
        let Some(option_type) = leg.leg_type.option_type() else {
            return Ok(None);
        };
        if !(observed.is_finite() && observed >= 0.0) {
            return Err(CalibrationError::InvalidObservation { price: observed }.into());
        }
        if !(t.is_finite() && t > 0.0) {
            return Err(CalibrationError::InvalidExpiry { expiry: t }.into());
        }
        if !(spot.is_finite() && spot > 0.0 && strike.is_finite() && strike > 0.0) {
            return Err(PricingError::invalid(format!(
                "calibration needs positive spot and strike, got S = {spot}, K = {strike}"
            )));
        }
        if !rate.is_finite() {
            return Err(PricingError::invalid(format!("rate must be finite, got {rate}")));
        }

        let result = if leg.leg_type.is_barrier() {
            self.grid_search(leg, spot, strike, rate, t, observed, token)?
        } else {
            self.newton(option_type, spot, strike, rate, t, observed)
        };

        if !result.converged {
            warn!(
                leg = %leg.leg_type,
                volatility = result.volatility,
                residual = result.residual,
                "implied volatility did not converge, returning best candidate"
            );
        }
        Ok(Some(result))
    }

    fn newton(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        t: f64,
        observed: f64,
    ) -> ImpliedVolatility {
        let model = |sigma: f64| BlackScholes::new(spot, rate, sigma).ok();
        let root = self.newton.find_root_bounded(
            |sigma| {
                model(sigma)
                    .map(|bs| bs.price(option_type, strike, t) - observed)
                    .unwrap_or(f64::NAN)
            },
            |sigma| {
                model(sigma)
                    .map(|bs| bs.vega(strike, t))
                    .unwrap_or(f64::NAN)
            },
            INITIAL_VOLATILITY,
            MIN_VOLATILITY,
            MAX_VOLATILITY,
        );
        ImpliedVolatility {
            volatility: root.x * 100.0,
            residual: root.residual,
            iterations: root.iterations,
            converged: root.converged,
            method: CalibrationMethod::NewtonRaphson,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn grid_search(
        &self,
        leg: &ResolvedLeg,
        spot: f64,
        strike: f64,
        rate: f64,
        t: f64,
        observed: f64,
        token: &CancellationToken,
    ) -> Result<ImpliedVolatility, PricingError> {
        let grid = GridSearch::new(GRID_LOWER, GRID_UPPER, GRID_STEPS)?;
        // Probe once so invalid legs surface as errors rather than skipped points.
        self.pricer
            .price_with_cancel(leg, spot, strike, rate, t, GRID_LOWER, self.method, None, token)?;

        let best = grid.minimise(|sigma| {
            self.pricer
                .price_with_cancel(leg, spot, strike, rate, t, sigma, self.method, None, token)
                .map(|p| (p - observed).abs())
                .unwrap_or(f64::NAN)
        });
        token.check()?;
        if !best.value.is_finite() {
            return Err(CalibrationError::NoFiniteCandidate {
                lower: GRID_LOWER,
                upper: GRID_UPPER,
            }
            .into());
        }

        let price = self
            .pricer
            .price_with_cancel(leg, spot, strike, rate, t, best.x, self.method, None, token)?;
        debug!(leg = %leg.leg_type, sigma = best.x, "barrier grid calibration done");
        Ok(ImpliedVolatility {
            volatility: best.x * 100.0,
            residual: price - observed,
            iterations: grid.len(),
            converged: true,
            method: CalibrationMethod::GridSearch,
        })
    }

    /// Implied volatility per period from observed prices of `leg`.
    ///
    /// The result is keyed like the implied-volatility override map and holds
    /// percentages. Periods without an observation, or already at maturity,
    /// are skipped. Strikes and barriers resolve against the schedule spot;
    /// the pricing spot of each period is its forward discounted back.
    pub fn calibrate_schedule(
        &self,
        schedule: &HedgeSchedule,
        leg: &StrategyLeg,
        observed: &HashMap<PeriodKey, f64>,
        overrides: &Overrides,
    ) -> Result<HashMap<PeriodKey, f64>, PricingError> {
        let resolved = leg.resolve(schedule.spot())?;
        if resolved.leg_type.option_type().is_none() {
            return Ok(HashMap::new());
        }
        let rate = schedule.rate();
        let spot = schedule.spot();
        let jobs: Vec<(PeriodKey, f64, f64, f64)> = schedule
            .periods()
            .iter()
            .filter(|p| p.time_to_maturity > 0.0)
            .filter_map(|p| {
                let price = *observed.get(&p.key)?;
                let t = p.time_to_maturity;
                let forward = overrides
                    .forward(&p.key)
                    .unwrap_or_else(|| spot * (rate * t).exp());
                Some((p.key, t, forward * (-rate * t).exp(), price))
            })
            .collect();

        let calibrate = |&(key, t, period_spot, price): &(PeriodKey, f64, f64, f64)| {
            self.implied_volatility(&resolved, period_spot, resolved.strike, rate, t, price)
                .map(|iv| iv.map(|iv| (key, iv.volatility)))
        };
        #[cfg(feature = "parallel")]
        let results: Vec<_> = jobs.par_iter().map(calibrate).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = jobs.iter().map(calibrate).collect();

        let mut vols = HashMap::with_capacity(results.len());
        for result in results {
            if let Some((key, vol)) = result? {
                vols.insert(key, vol);
            }
        }
        debug!(periods = vols.len(), "schedule calibration done");
        Ok(vols)
    }
}
