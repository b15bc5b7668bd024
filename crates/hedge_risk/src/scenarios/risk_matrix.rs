//! Probability-weighted risk matrix.
//!
//! Each [`StrategyConfig`] is evaluated against every [`PriceRange`] by
//! holding the settlement price at the range midpoint for the whole horizon.
//! The strategy hedges `coverage_ratio` percent of each period's volume; the
//! rest settles unhedged at the midpoint.

use std::collections::HashMap;

use hedge_core::types::PricingError;
use hedge_models::instruments::{Overrides, StrategyLeg};
use hedge_models::schedules::HedgeSchedule;
use hedge_pricing::mc::{CancellationToken, PathSet};
use rayon::prelude::*;
use tracing::debug;

use super::price_range::PriceRange;
use crate::error::RiskError;
use crate::valuation::{strategy_static_payoff, PricedSchedule, StrategyValuator};

/// A named strategy at a coverage ratio.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyConfig {
    /// Display name; together with the ratio it identifies the configuration.
    pub name: String,
    /// Strategy legs.
    pub legs: Vec<StrategyLeg>,
    /// Hedged share of the volume, in percent.
    pub coverage_ratio: f64,
}

impl StrategyConfig {
    /// Creates a configuration.
    pub fn new(name: impl Into<String>, legs: Vec<StrategyLeg>, coverage_ratio: f64) -> Self {
        Self {
            name: name.into(),
            legs,
            coverage_ratio,
        }
    }

    fn cache_key(&self) -> (String, u64) {
        (self.name.clone(), self.coverage_ratio.to_bits())
    }
}

/// P&L of one configuration in one price range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeOutcome {
    /// The scenario.
    pub range: PriceRange,
    /// Σ ΔP&L over the horizon at the range midpoint.
    pub difference: f64,
}

/// Risk-matrix row of one configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskMatrixResult {
    /// Strategy name.
    pub strategy: String,
    /// Coverage ratio in percent.
    pub coverage_ratio: f64,
    /// Σ strategy price × covered volume.
    pub hedging_cost: f64,
    /// One entry per price range, in input order.
    pub outcomes: Vec<RangeOutcome>,
    /// Probability-weighted mean of the differences.
    pub expected_value: Option<f64>,
}

/// `Σ(difference·p/100) / Σ(p/100)`; `None` when the probabilities sum to zero.
pub fn expected_value(outcomes: &[RangeOutcome]) -> Option<f64> {
    let (weighted, total) = outcomes.iter().fold((0.0, 0.0), |(w, t), o| {
        let p = o.range.probability / 100.0;
        (w + o.difference * p, t + p)
    });
    (total != 0.0).then(|| weighted / total)
}

/// Evaluates strategy configurations over price scenarios.
#[derive(Clone, Copy, Debug)]
pub struct RiskMatrixEngine<'a> {
    valuator: StrategyValuator<'a>,
}

impl<'a> RiskMatrixEngine<'a> {
    /// Creates an engine pricing strategies with `valuator`.
    pub fn new(valuator: StrategyValuator<'a>) -> Self {
        Self { valuator }
    }

    /// One result per configuration, in input order.
    ///
    /// Configurations sharing a name and coverage ratio are evaluated once.
    /// Leg prices ignore every override.
    ///
    /// # Errors
    ///
    /// Invalid ranges or coverage ratios, leg pricing errors and
    /// cancellation.
    pub fn evaluate(
        &self,
        schedule: &HedgeSchedule,
        configs: &[StrategyConfig],
        ranges: &[PriceRange],
        pricing_paths: &[PathSet],
        token: &CancellationToken,
    ) -> Result<Vec<RiskMatrixResult>, PricingError> {
        for range in ranges {
            range.validate()?;
        }
        for config in configs {
            let c = config.coverage_ratio;
            if !(c.is_finite() && (0.0..=100.0).contains(&c)) {
                return Err(RiskError::InvalidCoverage(c).into());
            }
        }

        let mut slots: HashMap<(String, u64), usize> = HashMap::new();
        let mut unique: Vec<&StrategyConfig> = Vec::new();
        let index: Vec<usize> = configs
            .iter()
            .map(|config| {
                *slots.entry(config.cache_key()).or_insert_with(|| {
                    unique.push(config);
                    unique.len() - 1
                })
            })
            .collect();
        debug!(
            configs = configs.len(),
            unique = unique.len(),
            ranges = ranges.len(),
            "evaluating risk matrix"
        );

        let overrides = Overrides::new();
        let evaluated = unique
            .par_iter()
            .map(|config| {
                token.check()?;
                let priced = self.valuator.price_schedule(
                    schedule,
                    &config.legs,
                    &overrides,
                    pricing_paths,
                    token,
                )?;
                Ok(evaluate_config(schedule, config, &priced, ranges))
            })
            .collect::<Result<Vec<_>, PricingError>>()?;
        token.check()?;

        Ok(index.into_iter().map(|i| evaluated[i].clone()).collect())
    }
}

fn evaluate_config(
    schedule: &HedgeSchedule,
    config: &StrategyConfig,
    priced: &PricedSchedule,
    ranges: &[PriceRange],
) -> RiskMatrixResult {
    let coverage = config.coverage_ratio / 100.0;
    let share = priced.swap_share;
    let option_share = 1.0 - share;

    let hedging_cost: f64 = schedule
        .periods()
        .iter()
        .zip(&priced.periods)
        .map(|(p, pricing)| pricing.strategy_price * p.volume * coverage)
        .sum();

    let outcomes: Vec<RangeOutcome> = ranges
        .iter()
        .map(|range| {
            let mid = range.midpoint();
            let hedged_price = share * priced.swap_price + option_share * mid;
            let difference: f64 = schedule
                .periods()
                .iter()
                .zip(&priced.periods)
                .map(|(p, pricing)| {
                    let volume = p.volume;
                    let covered = volume * coverage;
                    let payoff = strategy_static_payoff(&priced.legs, mid, pricing.forward);
                    let hedged = -(covered * hedged_price + (volume - covered) * mid)
                        - covered * option_share * pricing.strategy_price
                        + covered * option_share * payoff;
                    let unhedged = -(volume * mid);
                    hedged - unhedged
                })
                .sum();
            RangeOutcome {
                range: *range,
                difference,
            }
        })
        .collect();

    RiskMatrixResult {
        strategy: config.name.clone(),
        coverage_ratio: config.coverage_ratio,
        hedging_cost,
        expected_value: expected_value(&outcomes),
        outcomes,
    }
}
