use super::risk_matrix::{expected_value, RangeOutcome, RiskMatrixResult};

/// Coverage ratios of the variation view, in percent.
pub const COVERAGE_STEPS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

/// Rescales a computed result to each of [`COVERAGE_STEPS`].
///
/// Hedging cost and range differences are linear in the coverage ratio, so
/// no repricing is needed. `None` when `base` has zero coverage.
///
/// # Examples
///
/// ```
/// use hedge_risk::scenarios::{coverage_variations, PriceRange, RangeOutcome, RiskMatrixResult};
///
/// let base = RiskMatrixResult {
///     strategy: "collar".into(),
///     coverage_ratio: 50.0,
///     hedging_cost: 200.0,
///     outcomes: vec![RangeOutcome {
///         range: PriceRange::new(1.0, 1.2, 100.0).unwrap(),
///         difference: 40.0,
///     }],
///     expected_value: Some(40.0),
/// };
/// let variations = coverage_variations(&base).unwrap();
/// assert_eq!(variations[3].hedging_cost, 400.0);
/// assert_eq!(variations[0].outcomes[0].difference, 20.0);
/// ```
pub fn coverage_variations(base: &RiskMatrixResult) -> Option<Vec<RiskMatrixResult>> {
    if base.coverage_ratio == 0.0 {
        return None;
    }
    let variations = COVERAGE_STEPS
        .iter()
        .map(|&ratio| {
            let scale = ratio / base.coverage_ratio;
            let outcomes: Vec<RangeOutcome> = base
                .outcomes
                .iter()
                .map(|o| RangeOutcome {
                    range: o.range,
                    difference: o.difference * scale,
                })
                .collect();
            RiskMatrixResult {
                strategy: base.strategy.clone(),
                coverage_ratio: ratio,
                hedging_cost: base.hedging_cost * scale,
                expected_value: expected_value(&outcomes),
                outcomes,
            }
        })
        .collect();
    Some(variations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::PriceRange;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_coverage_has_no_variations() {
        let base = RiskMatrixResult {
            strategy: "none".into(),
            coverage_ratio: 0.0,
            hedging_cost: 0.0,
            outcomes: Vec::new(),
            expected_value: None,
        };
        assert!(coverage_variations(&base).is_none());
    }

    #[test]
    fn test_expected_value_rescales() {
        let range = PriceRange::new(1.0, 1.2, 60.0).unwrap();
        let base = RiskMatrixResult {
            strategy: "s".into(),
            coverage_ratio: 100.0,
            hedging_cost: 80.0,
            outcomes: vec![RangeOutcome {
                range,
                difference: -12.0,
            }],
            expected_value: Some(-12.0),
        };
        let v = coverage_variations(&base).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(v[1].coverage_ratio, 50.0);
        assert_relative_eq!(v[1].expected_value.unwrap(), -6.0, epsilon = 1e-12);
        assert_eq!(v[3].outcomes, base.outcomes);
        assert_eq!(v[3].hedging_cost, base.hedging_cost);
    }
}
