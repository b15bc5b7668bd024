//! Full hedge computation.
//!
//! [`HedgeEngine`] ties the layers together: it expands the hedge parameters
//! into a schedule, simulates real-price and pricing ensembles, values the
//! strategy per period and summarises the results. Every call recomputes
//! from its inputs. Starting a computation cancels any computation still
//! running on the same engine, which then returns `PricingError::Cancelled`.

use std::collections::HashMap;

use chrono::NaiveDate;
use hedge_core::types::{PeriodKey, PricingError};
use hedge_models::analytical::BlackScholes;
use hedge_models::instruments::{HedgeParams, Overrides, ResolvedLeg, StrategyLeg};
use hedge_models::schedules::HedgeSchedule;
use hedge_optimiser::calibration::VolatilityCalibrator;
use hedge_pricing::mc::{
    BarrierMonitoring, CancellationToken, GbmParams, MonteCarloConfig, PathSet, PathSimulator,
    RecomputeGate, DEFAULT_SEED, MAX_PATHS,
};
use hedge_pricing::rng::{PricerRng, ShockModel};
use hedge_pricing::{OptionPricer, PricingMethod};
use tracing::{debug, info};

use crate::error::RiskError;
use crate::scenarios::{PriceRange, RiskMatrixEngine, RiskMatrixResult, StrategyConfig};
use crate::valuation::{
    payoff_diagram, summarise, CostSummary, PayoffPoint, PeriodResult, StrategyValuator,
    YearlySummary,
};

/// Maximum number of paths reported in [`SimulationData`].
pub const MAX_REPORTED_PATHS: usize = 100;

/// Real-price volatility, in percent, when no option leg supplies one.
pub const DEFAULT_REAL_VOLATILITY: f64 = 10.0;

/// Where realized prices come from when no manual override exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RealizedPriceSource {
    /// Realized equals the period forward.
    #[default]
    Forward,
    /// First real-price simulation path at the period's step.
    Simulated,
}

/// Simulation and pricing settings of a computation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Paths in the real-price simulation.
    pub real_paths: usize,
    /// Paths per Monte Carlo barrier pricing ensemble.
    pub pricing_paths: usize,
    /// Barrier pricing method.
    pub method: PricingMethod,
    /// Base seed of both simulations.
    pub seed: u64,
    /// Shock distribution.
    pub shock: ShockModel,
    /// Monte Carlo barrier monitoring.
    pub monitoring: BarrierMonitoring,
    /// Fallback for realized prices.
    pub realized_source: RealizedPriceSource,
    /// Price with per-period implied-volatility overrides.
    pub use_implied_volatility: bool,
    /// Real-price volatility in percent; defaults to the first option leg's.
    pub real_volatility: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            real_paths: 1_000,
            pricing_paths: 10_000,
            method: PricingMethod::ClosedForm,
            seed: DEFAULT_SEED,
            shock: ShockModel::Gaussian,
            monitoring: BarrierMonitoring::BrownianBridge,
            realized_source: RealizedPriceSource::Forward,
            use_implied_volatility: false,
            real_volatility: None,
        }
    }
}

impl SimulationConfig {
    /// Checks path counts and the real-price volatility.
    pub fn validate(&self) -> Result<(), RiskError> {
        for (name, value) in [("real", self.real_paths), ("pricing", self.pricing_paths)] {
            if value == 0 || value > MAX_PATHS {
                return Err(RiskError::InvalidPathCount { name, value });
            }
        }
        if let Some(v) = self.real_volatility {
            if !(v.is_finite() && v > 0.0) {
                return Err(RiskError::InvalidVolatility(v));
            }
        }
        Ok(())
    }

    fn monte_carlo(&self, n_paths: usize) -> Result<MonteCarloConfig, PricingError> {
        Ok(MonteCarloConfig::builder()
            .n_paths(n_paths)
            .seed(self.seed)
            .shock(self.shock)
            .monitoring(self.monitoring)
            .build()?)
    }
}

/// Sampled simulation output for display.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationData {
    /// Maturity of each reported point.
    pub dates: Vec<NaiveDate>,
    /// Sampled real-price paths at the period steps.
    pub real_price_paths: Vec<Vec<f64>>,
    /// Key of the barrier leg whose prices are reported.
    pub barrier_leg: Option<String>,
    /// Price of that leg along each sampled path.
    pub option_price_paths: Vec<Vec<f64>>,
}

/// Output of [`HedgeEngine::compute`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HedgeResults {
    /// One result per period, by maturity.
    pub periods: Vec<PeriodResult>,
    /// Sums per calendar year.
    pub yearly: Vec<YearlySummary>,
    /// Sums over the horizon.
    pub total: CostSummary,
    /// Sampled simulation paths.
    pub simulation: SimulationData,
}

/// Stateless hedge calculator with supersede-on-recompute cancellation.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hedge_models::instruments::{HedgeParams, Horizon, LegType, Level, Overrides, StrategyLeg};
/// use hedge_risk::{HedgeEngine, SimulationConfig};
///
/// let config = SimulationConfig { real_paths: 50, ..Default::default() };
/// let engine = HedgeEngine::new(config).unwrap();
/// let params = HedgeParams {
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     horizon: Horizon::Months(12),
///     interest_rate: 2.0,
///     total_volume: 1_200_000.0,
///     spot_price: 1.10,
/// };
/// let legs = [StrategyLeg::new(LegType::PUT, Level::percent(95.0), 10.0, 100.0)];
/// let results = engine.compute(&params, &legs, &Overrides::new()).unwrap();
/// assert_eq!(results.periods.len(), 12);
/// assert_eq!(results.simulation.real_price_paths.len(), 50);
/// ```
#[derive(Clone, Debug)]
pub struct HedgeEngine {
    config: SimulationConfig,
    pricer: OptionPricer,
    gate: RecomputeGate,
    risk_gate: RecomputeGate,
}

impl HedgeEngine {
    /// Creates an engine for `config`.
    pub fn new(config: SimulationConfig) -> Result<Self, PricingError> {
        config.validate()?;
        let pricer = OptionPricer::new(config.monte_carlo(config.pricing_paths)?);
        Ok(Self {
            config,
            pricer,
            gate: RecomputeGate::new(),
            risk_gate: RecomputeGate::new(),
        })
    }

    /// Settings in use.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Cancels every hedge computation and risk matrix in flight.
    pub fn cancel(&self) {
        self.gate.cancel_all();
        self.risk_gate.cancel_all();
    }

    /// Starts a hedge computation, superseding any earlier one.
    ///
    /// Risk matrices run under their own gate and are not affected.
    pub fn begin(&self) -> CancellationToken {
        self.gate.begin()
    }

    fn valuator(&self) -> StrategyValuator<'_> {
        StrategyValuator::new(&self.pricer, self.config.method)
            .with_implied_volatility(self.config.use_implied_volatility)
    }

    /// Values `legs` over the schedule of `params`.
    pub fn compute(
        &self,
        params: &HedgeParams,
        legs: &[StrategyLeg],
        overrides: &Overrides,
    ) -> Result<HedgeResults, PricingError> {
        let token = self.begin();
        self.compute_with_token(params, legs, overrides, &token)
    }

    /// As [`HedgeEngine::compute`] under an existing token.
    pub fn compute_with_token(
        &self,
        params: &HedgeParams,
        legs: &[StrategyLeg],
        overrides: &Overrides,
        token: &CancellationToken,
    ) -> Result<HedgeResults, PricingError> {
        overrides.validate()?;
        let schedule = HedgeSchedule::build(params)?;
        let resolved = legs
            .iter()
            .map(|leg| leg.resolve(schedule.spot()))
            .collect::<Result<Vec<_>, _>>()?;

        let real_paths = self.simulate_real_prices(&schedule, &resolved, token)?;
        let pricing_paths = self.pricing_ensembles(&schedule, &resolved, token)?;

        let simulated_realized: Option<Vec<f64>> =
            (self.config.realized_source == RealizedPriceSource::Simulated).then(|| {
                let path = real_paths.path(0);
                real_paths.monthly_indices().iter().map(|&i| path[i]).collect()
            });

        let periods = self.valuator().value(
            &schedule,
            legs,
            overrides,
            simulated_realized.as_deref(),
            &pricing_paths,
            token,
        )?;

        let (yearly, total) = summarise(&periods);
        let simulation = self.simulation_data(&schedule, legs, &resolved, &real_paths)?;

        token.check()?;
        info!(
            periods = periods.len(),
            legs = legs.len(),
            delta_pnl = total.delta_pnl,
            "hedge computation complete"
        );
        Ok(HedgeResults {
            periods,
            yearly,
            total,
            simulation,
        })
    }

    /// Risk matrix of `configs` over `ranges` on the schedule of `params`.
    ///
    /// Supersedes an earlier risk matrix still running, never a hedge
    /// computation.
    pub fn risk_matrix(
        &self,
        params: &HedgeParams,
        configs: &[StrategyConfig],
        ranges: &[PriceRange],
    ) -> Result<Vec<RiskMatrixResult>, PricingError> {
        let token = self.risk_gate.begin();
        let schedule = HedgeSchedule::build(params)?;
        let mut resolved = Vec::new();
        for config in configs {
            for leg in &config.legs {
                resolved.push(leg.resolve(schedule.spot())?);
            }
        }
        let pricing_paths = self.pricing_ensembles(&schedule, &resolved, &token)?;
        let results = RiskMatrixEngine::new(StrategyValuator::new(&self.pricer, self.config.method))
            .evaluate(&schedule, configs, ranges, &pricing_paths, &token)?;
        info!(
            configs = configs.len(),
            ranges = ranges.len(),
            "risk matrix complete"
        );
        Ok(results)
    }

    /// Static payoff diagram over ±`width` percent around spot.
    pub fn payoff_diagram(
        &self,
        params: &HedgeParams,
        legs: &[StrategyLeg],
        width: f64,
        points: usize,
    ) -> Result<Vec<PayoffPoint>, PricingError> {
        if !(width.is_finite() && width > 0.0 && width < 100.0) {
            return Err(PricingError::invalid(format!(
                "payoff diagram width must be in (0, 100) percent, got {width}"
            )));
        }
        let spot = params.spot_price;
        if !(spot.is_finite() && spot > 0.0) {
            return Err(PricingError::invalid(format!("invalid spot price {spot}")));
        }
        let resolved = legs
            .iter()
            .map(|leg| leg.resolve(spot))
            .collect::<Result<Vec<_>, _>>()?;
        let half = spot * width / 100.0;
        Ok(payoff_diagram(&resolved, spot - half, spot + half, points, spot))
    }

    /// Implied-volatility overrides for `leg` from observed prices.
    pub fn calibrate(
        &self,
        params: &HedgeParams,
        leg: &StrategyLeg,
        observed: &HashMap<PeriodKey, f64>,
        overrides: &Overrides,
    ) -> Result<HashMap<PeriodKey, f64>, PricingError> {
        overrides.validate()?;
        let schedule = HedgeSchedule::build(params)?;
        self.calibrator()
            .calibrate_schedule(&schedule, leg, observed, overrides)
    }

    /// Calibrator sharing this engine's pricer and method.
    pub fn calibrator(&self) -> VolatilityCalibrator {
        VolatilityCalibrator::new(self.pricer.clone(), self.config.method)
    }

    fn real_volatility(&self, legs: &[ResolvedLeg]) -> f64 {
        self.config
            .real_volatility
            .map(|v| v / 100.0)
            .or_else(|| {
                legs.iter()
                    .find(|l| l.leg_type.option_type().is_some() && l.volatility > 0.0)
                    .map(|l| l.volatility)
            })
            .unwrap_or(DEFAULT_REAL_VOLATILITY / 100.0)
    }

    fn simulate_real_prices(
        &self,
        schedule: &HedgeSchedule,
        legs: &[ResolvedLeg],
        token: &CancellationToken,
    ) -> Result<PathSet, PricingError> {
        let volatility = self.real_volatility(legs);
        let simulator = PathSimulator::new(self.config.monte_carlo(self.config.real_paths)?);
        Ok(simulator.generate_with_cancel(
            self.config.real_paths,
            GbmParams {
                spot: schedule.spot(),
                rate: schedule.rate(),
                volatility,
                horizon: schedule.horizon_years(),
            },
            &schedule.period_times(),
            token,
        )?)
    }

    /// One shared ensemble per distinct volatility of the barrier legs that
    /// will be priced by Monte Carlo.
    fn pricing_ensembles(
        &self,
        schedule: &HedgeSchedule,
        legs: &[ResolvedLeg],
        token: &CancellationToken,
    ) -> Result<Vec<PathSet>, PricingError> {
        let mut volatilities: Vec<f64> = legs
            .iter()
            .filter(|l| l.leg_type.is_barrier())
            .filter(|l| {
                self.config.method == PricingMethod::MonteCarlo
                    || !l.leg_type.supports_closed_form()
            })
            .map(|l| l.volatility)
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        volatilities.sort_by(|a, b| a.total_cmp(b));
        volatilities.dedup();

        let simulator = PathSimulator::new(*self.pricer.config());
        let ensembles = volatilities
            .into_iter()
            .map(|volatility| {
                debug!(volatility, "simulating pricing ensemble");
                simulator.generate_with_cancel(
                    self.config.pricing_paths,
                    GbmParams {
                        spot: schedule.spot(),
                        rate: schedule.rate(),
                        volatility,
                        horizon: schedule.horizon_years(),
                    },
                    &[],
                    token,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ensembles)
    }

    fn simulation_data(
        &self,
        schedule: &HedgeSchedule,
        legs: &[StrategyLeg],
        resolved: &[ResolvedLeg],
        paths: &PathSet,
    ) -> Result<SimulationData, PricingError> {
        let mut indices: Vec<usize> = (0..paths.n_paths()).collect();
        if indices.len() > MAX_REPORTED_PATHS {
            // Partial Fisher-Yates: the first MAX_REPORTED_PATHS slots hold the sample.
            let mut rng = PricerRng::from_seed(self.config.seed);
            for i in 0..MAX_REPORTED_PATHS {
                let j = i + rng.gen_index(indices.len() - i);
                indices.swap(i, j);
            }
            indices.truncate(MAX_REPORTED_PATHS);
        }

        let steps = paths.monthly_indices();
        let real_price_paths: Vec<Vec<f64>> = indices
            .iter()
            .map(|&p| {
                let path = paths.path(p);
                steps.iter().map(|&s| path[s]).collect()
            })
            .collect();

        let barrier = resolved
            .iter()
            .position(|l| l.leg_type.is_barrier() && l.leg_type.option_type().is_some());
        let (barrier_leg, option_price_paths) = match barrier {
            Some(j) => {
                let leg = &resolved[j];
                let final_time = schedule
                    .periods()
                    .last()
                    .map_or(0.0, |p| p.time_to_maturity);
                let option_paths = real_price_paths
                    .iter()
                    .map(|prices| {
                        prices
                            .iter()
                            .zip(schedule.periods())
                            .map(|(&s, period)| {
                                let remaining = (final_time - period.time_to_maturity).max(0.0);
                                self.display_price(leg, s, schedule.rate(), remaining)
                            })
                            .collect::<Result<Vec<f64>, PricingError>>()
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (Some(legs[j].key(j)), option_paths)
            }
            None => (None, Vec::new()),
        };

        Ok(SimulationData {
            dates: schedule.periods().iter().map(|p| p.maturity).collect(),
            real_price_paths,
            barrier_leg,
            option_price_paths,
        })
    }

    /// Closed form where the leg has one, Black-Scholes vanilla otherwise.
    fn display_price(
        &self,
        leg: &ResolvedLeg,
        spot: f64,
        rate: f64,
        t: f64,
    ) -> Result<f64, PricingError> {
        if leg.leg_type.supports_closed_form() {
            return self.pricer.price(
                leg,
                spot,
                leg.strike,
                rate,
                t,
                leg.volatility,
                PricingMethod::ClosedForm,
                None,
            );
        }
        let Some(option_type) = leg.leg_type.option_type() else {
            return Ok(0.0);
        };
        Ok(BlackScholes::new(spot, rate, leg.volatility)?.price(option_type, leg.strike, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedge_models::instruments::{Horizon, LegType, Level};

    fn params(months: u32) -> HedgeParams {
        HedgeParams {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            horizon: Horizon::Months(months),
            interest_rate: 2.0,
            total_volume: 12_000.0,
            spot_price: 1.10,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SimulationConfig::default().validate().is_ok());
        let bad = SimulationConfig {
            pricing_paths: 0,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(RiskError::InvalidPathCount {
                name: "pricing",
                value: 0
            })
        );
        let bad = SimulationConfig {
            real_volatility: Some(-1.0),
            ..Default::default()
        };
        assert!(HedgeEngine::new(bad).is_err());
    }

    #[test]
    fn test_real_volatility_fallbacks() {
        let engine = HedgeEngine::new(SimulationConfig::default()).unwrap();
        let swap = StrategyLeg::new(LegType::SWAP, Level::percent(100.0), 0.0, 50.0)
            .resolve(1.0)
            .unwrap();
        let put = StrategyLeg::new(LegType::PUT, Level::percent(100.0), 14.0, 50.0)
            .resolve(1.0)
            .unwrap();
        assert!((engine.real_volatility(&[swap]) - 0.10).abs() < 1e-12);
        assert!((engine.real_volatility(&[swap, put]) - 0.14).abs() < 1e-12);

        let fixed = HedgeEngine::new(SimulationConfig {
            real_volatility: Some(8.0),
            ..Default::default()
        })
        .unwrap();
        assert!((fixed.real_volatility(&[put]) - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_simulation_data_shape() {
        let engine = HedgeEngine::new(SimulationConfig {
            real_paths: 250,
            ..Default::default()
        })
        .unwrap();
        let legs = [StrategyLeg::new(
            "call-knockout".parse().unwrap(),
            Level::percent(100.0),
            10.0,
            100.0,
        )
        .with_barriers(Level::percent(120.0), None)];
        let results = engine.compute(&params(6), &legs, &Overrides::new()).unwrap();
        let sim = &results.simulation;
        assert_eq!(sim.dates.len(), 6);
        assert_eq!(sim.real_price_paths.len(), MAX_REPORTED_PATHS);
        assert!(sim.real_price_paths.iter().all(|p| p.len() == 6));
        assert_eq!(sim.barrier_leg.as_deref(), Some("0-call-knockout"));
        assert_eq!(sim.option_price_paths.len(), MAX_REPORTED_PATHS);
        assert!(sim.option_price_paths.iter().flatten().all(|p| *p >= 0.0));
    }

    #[test]
    fn test_pricing_ensembles_only_for_monte_carlo_legs() {
        let engine = HedgeEngine::new(SimulationConfig {
            pricing_paths: 500,
            ..Default::default()
        })
        .unwrap();
        let schedule = HedgeSchedule::build(&params(3)).unwrap();
        let ko = StrategyLeg::new(
            "put-knockout".parse().unwrap(),
            Level::percent(100.0),
            10.0,
            100.0,
        )
        .with_barriers(Level::percent(90.0), None)
        .resolve(1.1)
        .unwrap();
        let double = StrategyLeg::new(
            "call-double-knockout".parse().unwrap(),
            Level::percent(100.0),
            12.0,
            100.0,
        )
        .with_barriers(Level::percent(120.0), Some(Level::percent(85.0)))
        .resolve(1.1)
        .unwrap();
        let token = CancellationToken::never();
        let ensembles = engine.pricing_ensembles(&schedule, &[ko, double], &token).unwrap();
        assert_eq!(ensembles.len(), 1);
        assert!(ensembles[0].is_compatible(schedule.rate(), 0.12, schedule.horizon_years()));
    }
}
