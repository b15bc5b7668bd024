//! Per-period strategy valuation.
//!
//! For every period of a [`HedgeSchedule`] the valuator prices each leg,
//! settles it against the realized price, and compares the hedged cash flow
//! with the unhedged one:
//!
//! ```text
//! hedgedPrice  = swapShare·swapPrice + (1 − swapShare)·realized
//! hedgedCost   = −volume·hedgedPrice
//!                − volume·(1 − swapShare)·strategyPrice
//!                + volume·(1 − swapShare)·totalPayoff
//! unhedgedCost = −volume·realized
//! deltaPnL     = hedgedCost − unhedgedCost
//! ```

use chrono::NaiveDate;
use hedge_core::types::{PeriodKey, PricingError};
use hedge_models::instruments::{LegType, Overrides, ResolvedLeg, StrategyLeg};
use hedge_models::schedules::HedgeSchedule;
use hedge_pricing::mc::{CancellationToken, PathSet};
use hedge_pricing::{OptionPricer, PricingMethod};
use rayon::prelude::*;
use tracing::debug;

use crate::barrier_state::BarrierStateTracker;

use super::payoff::leg_payoff;

/// Price and settlement of one leg in one period.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegValuation {
    /// Override-map key, e.g. `"0-call-knockout"`.
    pub key: String,
    /// Leg type.
    pub leg_type: LegType,
    /// Premium per unit of volume.
    pub price: f64,
    /// Payoff per unit of volume at the realized price.
    pub payoff: f64,
    /// Barrier state; `None` for non-barrier legs.
    pub triggered: Option<bool>,
}

/// Valuation of one hedge period.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodResult {
    /// Maturity date.
    pub date: NaiveDate,
    /// Month key of the maturity.
    pub key: PeriodKey,
    /// Act/365 years from the start date.
    pub time_to_maturity: f64,
    /// Forward price.
    pub forward: f64,
    /// Realized price.
    pub realized: f64,
    /// Per-leg prices and payoffs in leg order.
    pub legs: Vec<LegValuation>,
    /// Σ leg price × quantity.
    pub strategy_price: f64,
    /// Σ leg payoff × quantity.
    pub total_payoff: f64,
    /// Volume settling in the period.
    pub monthly_volume: f64,
    /// Cash flow with the hedge.
    pub hedged_cost: f64,
    /// Cash flow without the hedge.
    pub unhedged_cost: f64,
    /// `hedged_cost − unhedged_cost`.
    pub delta_pnl: f64,
}

/// Market inputs and leg prices of one period, before settlement.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodPricing {
    /// Forward price (override or carry).
    pub forward: f64,
    /// Spot implied by the forward, used for option pricing.
    pub pricing_spot: f64,
    /// Leg prices in leg order.
    pub leg_prices: Vec<f64>,
    /// Σ leg price × quantity.
    pub strategy_price: f64,
}

/// Leg prices for a whole schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct PricedSchedule {
    /// Legs resolved against the schedule spot.
    pub legs: Vec<ResolvedLeg>,
    /// Override-map keys of the legs.
    pub keys: Vec<String>,
    /// One entry per period.
    pub periods: Vec<PeriodPricing>,
    /// Volume-weighted discounted forward, the price of every swap leg.
    pub swap_price: f64,
    /// Σ swap quantities as a fraction.
    pub swap_share: f64,
}

/// Forward of every period: the manual override, else `spot·exp(r·t)`.
pub fn forwards(schedule: &HedgeSchedule, overrides: &Overrides) -> Vec<f64> {
    let spot = schedule.spot();
    let rate = schedule.rate();
    schedule
        .periods()
        .iter()
        .map(|p| {
            overrides
                .forward(&p.key)
                .unwrap_or_else(|| spot * (rate * p.time_to_maturity).exp())
        })
        .collect()
}

/// Volume-weighted average of the discounted forwards over the horizon.
///
/// Falls back to the plain average when the schedule carries no volume.
pub fn swap_price(schedule: &HedgeSchedule, forwards: &[f64]) -> f64 {
    let rate = schedule.rate();
    let discounted = schedule
        .periods()
        .iter()
        .zip(forwards)
        .map(|(p, f)| (p.volume, f * (-rate * p.time_to_maturity).exp()));

    let (weighted, volume, plain, n) = discounted.fold(
        (0.0, 0.0, 0.0, 0usize),
        |(w, v, s, n), (vol, df)| (w + vol * df, v + vol, s + df, n + 1),
    );
    if volume != 0.0 {
        weighted / volume
    } else if n > 0 {
        plain / n as f64
    } else {
        0.0
    }
}

/// Settles one period into its cash flows.
///
/// Returns `(hedged_cost, unhedged_cost, delta_pnl)`.
pub fn period_cash_flows(
    volume: f64,
    realized: f64,
    swap_share: f64,
    swap_price: f64,
    strategy_price: f64,
    total_payoff: f64,
) -> (f64, f64, f64) {
    let option_share = 1.0 - swap_share;
    let hedged_price = swap_share * swap_price + option_share * realized;
    let hedged = -(volume * hedged_price) - (volume * option_share * strategy_price)
        + (volume * option_share * total_payoff);
    let unhedged = -(volume * realized);
    (hedged, unhedged, hedged - unhedged)
}

/// Combines leg prices and payoffs into [`PeriodResult`]s.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hedge_models::instruments::{HedgeParams, Horizon, Overrides};
/// use hedge_models::schedules::HedgeSchedule;
/// use hedge_pricing::mc::CancellationToken;
/// use hedge_pricing::{OptionPricer, PricingMethod};
/// use hedge_risk::valuation::StrategyValuator;
///
/// let schedule = HedgeSchedule::build(&HedgeParams {
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     horizon: Horizon::Months(3),
///     interest_rate: 2.0,
///     total_volume: 3_000.0,
///     spot_price: 1.1,
/// })
/// .unwrap();
/// let pricer = OptionPricer::default();
/// let results = StrategyValuator::new(&pricer, PricingMethod::ClosedForm)
///     .value(&schedule, &[], &Overrides::new(), None, &[], &CancellationToken::never())
///     .unwrap();
/// assert_eq!(results.len(), 3);
/// assert!(results.iter().all(|r| r.strategy_price == 0.0 && r.delta_pnl == 0.0));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StrategyValuator<'a> {
    pricer: &'a OptionPricer,
    method: PricingMethod,
    use_implied_volatility: bool,
}

impl<'a> StrategyValuator<'a> {
    /// Creates a valuator pricing legs with `pricer` under `method`.
    pub fn new(pricer: &'a OptionPricer, method: PricingMethod) -> Self {
        Self {
            pricer,
            method,
            use_implied_volatility: false,
        }
    }

    /// Prices with the implied-volatility override of a period when present.
    pub fn with_implied_volatility(mut self, enabled: bool) -> Self {
        self.use_implied_volatility = enabled;
        self
    }

    /// Prices every leg in every period.
    ///
    /// Custom option prices replace computed prices; swap legs take the
    /// schedule's swap price. Monte Carlo legs reuse the first compatible
    /// ensemble of `pricing_paths`.
    pub fn price_schedule(
        &self,
        schedule: &HedgeSchedule,
        legs: &[StrategyLeg],
        overrides: &Overrides,
        pricing_paths: &[PathSet],
        token: &CancellationToken,
    ) -> Result<PricedSchedule, PricingError> {
        overrides.validate()?;
        let spot = schedule.spot();
        let rate = schedule.rate();
        let resolved = legs
            .iter()
            .map(|leg| leg.resolve(spot))
            .collect::<Result<Vec<_>, _>>()?;
        let keys: Vec<String> = legs.iter().enumerate().map(|(i, l)| l.key(i)).collect();
        let forwards = forwards(schedule, overrides);
        let swap_price = swap_price(schedule, &forwards);
        let swap_share: f64 = resolved
            .iter()
            .filter(|l| l.leg_type.option_type().is_none())
            .map(|l| l.weight)
            .sum();

        let periods = schedule
            .periods()
            .par_iter()
            .zip(forwards.par_iter())
            .map(|(period, &forward)| {
                token.check()?;
                let t = period.time_to_maturity;
                let pricing_spot = forward * (-rate * t).exp();
                let implied = if self.use_implied_volatility {
                    overrides.implied_volatility(&period.key)
                } else {
                    None
                };

                let leg_prices = resolved
                    .iter()
                    .zip(&keys)
                    .map(|(leg, key)| {
                        if let Some(custom) = overrides.custom_price(&period.key, key) {
                            return Ok(custom);
                        }
                        if leg.leg_type.option_type().is_none() {
                            return Ok(swap_price);
                        }
                        let sigma = implied.map_or(leg.volatility, |v| v / 100.0);
                        let paths = pricing_paths.iter().find(|p| p.is_compatible(rate, sigma, t));
                        self.pricer.price_with_cancel(
                            leg,
                            pricing_spot,
                            leg.strike,
                            rate,
                            t,
                            sigma,
                            self.method,
                            paths,
                            token,
                        )
                    })
                    .collect::<Result<Vec<f64>, PricingError>>()?;

                let strategy_price: f64 = leg_prices
                    .iter()
                    .zip(&resolved)
                    .map(|(p, leg)| p * leg.weight)
                    .sum();
                Ok(PeriodPricing {
                    forward,
                    pricing_spot,
                    leg_prices,
                    strategy_price,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        Ok(PricedSchedule {
            legs: resolved,
            keys,
            periods,
            swap_price,
            swap_share,
        })
    }

    /// Values `legs` over `schedule`.
    ///
    /// The realized price of a period is its manual override, else the
    /// matching entry of `simulated_realized`, else the forward.
    ///
    /// # Errors
    ///
    /// Invalid overrides, leg resolution and pricing errors, and
    /// `PricingError::Cancelled` once `token` is cancelled.
    pub fn value(
        &self,
        schedule: &HedgeSchedule,
        legs: &[StrategyLeg],
        overrides: &Overrides,
        simulated_realized: Option<&[f64]>,
        pricing_paths: &[PathSet],
        token: &CancellationToken,
    ) -> Result<Vec<PeriodResult>, PricingError> {
        let priced = self.price_schedule(schedule, legs, overrides, pricing_paths, token)?;

        let realized: Vec<f64> = schedule
            .periods()
            .iter()
            .zip(&priced.periods)
            .enumerate()
            .map(|(i, (period, pricing))| {
                overrides
                    .realized(&period.key)
                    .or_else(|| simulated_realized.and_then(|s| s.get(i).copied()))
                    .unwrap_or(pricing.forward)
            })
            .collect();
        let states = BarrierStateTracker::track(&priced.legs, &realized);

        let results = schedule
            .periods()
            .iter()
            .zip(&priced.periods)
            .zip(&realized)
            .map(|((period, pricing), &realized)| {
                let legs: Vec<LegValuation> = priced
                    .legs
                    .iter()
                    .enumerate()
                    .map(|(j, leg)| {
                        let triggered = states.is_triggered(j, period.index);
                        LegValuation {
                            key: priced.keys[j].clone(),
                            leg_type: leg.leg_type,
                            price: pricing.leg_prices[j],
                            payoff: leg_payoff(
                                leg,
                                realized,
                                pricing.forward,
                                triggered.unwrap_or(false),
                            ),
                            triggered,
                        }
                    })
                    .collect();
                let total_payoff: f64 = legs
                    .iter()
                    .zip(&priced.legs)
                    .map(|(v, leg)| v.payoff * leg.weight)
                    .sum();
                let (hedged_cost, unhedged_cost, delta_pnl) = period_cash_flows(
                    period.volume,
                    realized,
                    priced.swap_share,
                    priced.swap_price,
                    pricing.strategy_price,
                    total_payoff,
                );
                PeriodResult {
                    date: period.maturity,
                    key: period.key,
                    time_to_maturity: period.time_to_maturity,
                    forward: pricing.forward,
                    realized,
                    legs,
                    strategy_price: pricing.strategy_price,
                    total_payoff,
                    monthly_volume: period.volume,
                    hedged_cost,
                    unhedged_cost,
                    delta_pnl,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            periods = results.len(),
            legs = priced.legs.len(),
            "strategy valued"
        );
        Ok(results)
    }
}
