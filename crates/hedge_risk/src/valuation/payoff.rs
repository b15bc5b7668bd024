//! Leg payoffs at a settlement price.

use hedge_models::analytical::KnockType;
use hedge_models::instruments::ResolvedLeg;

/// Payoff of `leg` at `price`.
///
/// Options pay their intrinsic value, gated for barrier legs by `triggered`:
/// knock-outs pay nothing once triggered, knock-ins pay only once triggered.
/// Swaps pay `forward − price`. `triggered` is ignored for non-barrier legs.
pub fn leg_payoff(leg: &ResolvedLeg, price: f64, forward: f64, triggered: bool) -> f64 {
    let Some(option_type) = leg.leg_type.option_type() else {
        return forward - price;
    };
    let intrinsic = option_type.intrinsic(price, leg.strike);
    match leg.leg_type.knock_type() {
        None => intrinsic,
        Some(KnockType::Out) if triggered => 0.0,
        Some(KnockType::Out) => intrinsic,
        Some(KnockType::In) if triggered => intrinsic,
        Some(KnockType::In) => 0.0,
    }
}

/// Payoff at `price` under the static approximation: barrier legs count as
/// triggered exactly when `price` itself meets the barrier condition.
pub fn static_payoff(leg: &ResolvedLeg, price: f64, forward: f64) -> f64 {
    leg_payoff(leg, price, forward, leg.is_touched(price))
}

/// Quantity-weighted static payoff of a strategy.
pub fn strategy_static_payoff(legs: &[ResolvedLeg], price: f64, forward: f64) -> f64 {
    legs.iter()
        .map(|leg| static_payoff(leg, price, forward) * leg.weight)
        .sum()
}

/// One point of a payoff diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayoffPoint {
    /// Underlying price at settlement.
    pub price: f64,
    /// Quantity-weighted strategy payoff.
    pub payoff: f64,
}

/// Static payoff diagram over `[lower, upper]` with `points` evenly spaced prices.
///
/// Swap legs settle against `reference`, the rate they lock in.
///
/// # Examples
///
/// ```
/// use hedge_models::instruments::{LegType, Level, StrategyLeg};
/// use hedge_risk::valuation::payoff_diagram;
///
/// let put = StrategyLeg::new(LegType::PUT, Level::percent(100.0), 10.0, 100.0)
///     .resolve(1.0)
///     .unwrap();
/// let diagram = payoff_diagram(&[put], 0.8, 1.2, 5, 1.0);
/// assert_eq!(diagram.len(), 5);
/// assert!((diagram[0].payoff - 0.2).abs() < 1e-12);
/// assert_eq!(diagram[4].payoff, 0.0);
/// ```
pub fn payoff_diagram(
    legs: &[ResolvedLeg],
    lower: f64,
    upper: f64,
    points: usize,
    reference: f64,
) -> Vec<PayoffPoint> {
    let step = match points {
        0 => return Vec::new(),
        1 => 0.0,
        n => (upper - lower) / (n - 1) as f64,
    };
    (0..points)
        .map(|i| {
            let price = if i + 1 == points && points > 1 {
                upper
            } else {
                lower + step * i as f64
            };
            PayoffPoint {
                price,
                payoff: strategy_static_payoff(legs, price, reference),
            }
        })
        .collect()
}
