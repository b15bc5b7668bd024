//! Path-dependent barrier state along the realized price series.
//!
//! Each barrier leg carries one "triggered" flag per period. The flag flips
//! to `true` the first period the realized price meets the leg's barrier
//! condition and stays set for every later period, whatever the price does
//! afterwards. Knock-out and knock-in legs share this absorbing state; only
//! the payoff consequence differs.

use hedge_models::instruments::ResolvedLeg;

/// Triggered flags per leg and period.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierStates {
    legs: Vec<Option<Vec<bool>>>,
    n_periods: usize,
}

impl BarrierStates {
    /// Number of legs tracked, barrier or not.
    pub fn n_legs(&self) -> usize {
        self.legs.len()
    }

    /// Number of periods.
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    /// Flags of leg `leg`; `None` for non-barrier legs or an out-of-range index.
    pub fn leg(&self, leg: usize) -> Option<&[bool]> {
        self.legs.get(leg)?.as_deref()
    }

    /// Whether leg `leg` is triggered in period `period`; `None` for
    /// non-barrier legs.
    pub fn is_triggered(&self, leg: usize, period: usize) -> Option<bool> {
        self.leg(leg)?.get(period).copied()
    }

    /// First period at which leg `leg` triggered.
    pub fn first_trigger(&self, leg: usize) -> Option<usize> {
        self.leg(leg)?.iter().position(|&t| t)
    }
}

/// Derives [`BarrierStates`] from a realized price series.
///
/// # Examples
///
/// ```
/// use hedge_models::instruments::{Level, StrategyLeg};
/// use hedge_risk::BarrierStateTracker;
///
/// let leg = StrategyLeg::new("call-knockout".parse().unwrap(), Level::percent(100.0), 10.0, 100.0)
///     .with_barriers(Level::percent(110.0), None)
///     .resolve(1.0)
///     .unwrap();
/// let states = BarrierStateTracker::track(&[leg], &[1.02, 1.12, 1.05]);
/// assert_eq!(states.leg(0), Some(&[false, true, true][..]));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BarrierStateTracker;

impl BarrierStateTracker {
    /// Tracks every leg of `legs` over `realized`, one price per period in
    /// chronological order.
    pub fn track(legs: &[ResolvedLeg], realized: &[f64]) -> BarrierStates {
        let legs: Vec<Option<Vec<bool>>> = legs
            .iter()
            .map(|leg| {
                leg.leg_type.is_barrier().then(|| {
                    realized
                        .iter()
                        .scan(false, |triggered, &price| {
                            *triggered = *triggered || leg.is_touched(price);
                            Some(*triggered)
                        })
                        .collect::<Vec<bool>>()
                })
            })
            .collect();
        BarrierStates {
            legs,
            n_periods: realized.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedge_models::instruments::{LegType, Level, StrategyLeg};
    use proptest::prelude::*;

    fn leg(tag: &str, h: f64, second: Option<f64>) -> ResolvedLeg {
        StrategyLeg::new(tag.parse::<LegType>().unwrap(), Level::absolute(100.0), 10.0, 100.0)
            .with_barriers(Level::absolute(h), second.map(Level::absolute))
            .resolve(100.0)
            .unwrap()
    }

    #[test]
    fn test_non_barrier_has_no_state() {
        let call = StrategyLeg::new(LegType::CALL, Level::absolute(100.0), 10.0, 100.0)
            .resolve(100.0)
            .unwrap();
        let states = BarrierStateTracker::track(&[call], &[90.0, 130.0]);
        assert_eq!(states.leg(0), None);
        assert_eq!(states.is_triggered(0, 1), None);
        assert_eq!(states.n_legs(), 1);
    }

    #[test]
    fn test_absorbing_after_knock() {
        let states = BarrierStateTracker::track(
            &[leg("put-knockin", 90.0, None)],
            &[100.0, 95.0, 90.0, 105.0, 110.0],
        );
        assert_eq!(states.leg(0), Some(&[false, false, true, true, true][..]));
        assert_eq!(states.first_trigger(0), Some(2));
    }

    #[test]
    fn test_reverse_and_double_shapes() {
        let prices = [100.0, 112.0, 88.0];
        let states = BarrierStateTracker::track(
            &[
                leg("call-reverse-knockout", 90.0, None),
                leg("put-reverse-knockout", 110.0, None),
                leg("call-double-knockin", 115.0, Some(85.0)),
            ],
            &prices,
        );
        assert_eq!(states.leg(0), Some(&[false, false, true][..]));
        assert_eq!(states.leg(1), Some(&[false, true, true][..]));
        assert_eq!(states.leg(2), Some(&[false, false, false][..]));
    }

    #[test]
    fn test_empty_series() {
        let states = BarrierStateTracker::track(&[leg("call-knockout", 120.0, None)], &[]);
        assert_eq!(states.n_periods(), 0);
        assert_eq!(states.first_trigger(0), None);
    }

    proptest! {
        #[test]
        fn prop_monotone(
            prices in prop::collection::vec(50.0f64..150.0, 1..40),
            h in 60.0f64..140.0,
        ) {
            let states = BarrierStateTracker::track(&[leg("call-knockout", h, None)], &prices);
            let flags = states.leg(0).unwrap();
            prop_assert!(flags.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(flags[0], prices[0] >= h);
        }
    }
}
