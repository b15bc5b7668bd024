//! Integration tests for the public surface of hedge_core.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use hedge_core::math::distributions::{norm_cdf, norm_pdf};
use hedge_core::math::solvers::{GridSearch, NewtonRaphsonSolver, SolverConfig};
use hedge_core::types::time::{month_end_after, time_to_maturity};
use hedge_core::types::{PeriodKey, PricingError};
use proptest::prelude::*;

#[test]
fn test_newton_inverts_cdf() {
    // Solve Φ(x) = 0.975 for the 97.5% quantile.
    let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-10, 50));
    let q = solver
        .find_root(|x| norm_cdf(x) - 0.975, norm_pdf, 0.0)
        .unwrap();
    assert_relative_eq!(q, 1.959_964, epsilon = 1e-5);
}

#[test]
fn test_grid_and_newton_agree() {
    let grid = GridSearch::new(0.0, 3.0, 3000).unwrap();
    let best = grid.minimise(|x| (norm_cdf(x) - 0.9).abs());
    let solver = NewtonRaphsonSolver::with_defaults();
    let root = solver.find_root(|x| norm_cdf(x) - 0.9, norm_pdf, 1.0).unwrap();
    assert!((best.x - root).abs() < 1e-3);
}

#[test]
fn test_period_key_matches_month_end() {
    let start = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
    let end = month_end_after(start, 2).unwrap();
    assert_eq!(PeriodKey::from_date(end).to_string(), "2026-2");
    assert!(time_to_maturity(start, end) > 0.0);
}

#[test]
fn test_period_key_error_is_invalid_input() {
    let err = "2025-0".parse::<PeriodKey>().unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));
}

proptest! {
    #[test]
    fn prop_cdf_is_monotone(a in -8.0f64..8.0, b in -8.0f64..8.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(norm_cdf(lo) <= norm_cdf(hi) + 1e-12);
    }

    #[test]
    fn prop_cdf_in_unit_interval(x in -50.0f64..50.0) {
        let p = norm_cdf(x);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn prop_month_end_is_last_day(y in 1990i32..2100, m in 1u32..=12, off in 0u32..36) {
        let start = NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        let end = month_end_after(start, off).unwrap();
        prop_assert!(end.succ_opt().map(|n| chrono::Datelike::day(&n) == 1).unwrap_or(true));
    }
}
