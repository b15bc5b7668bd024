//! Price-scenario analysis.
//!
//! - [`PriceRange`]: a probability-weighted band of settlement prices
//! - [`RiskMatrixEngine`]: P&L of each strategy configuration per band
//! - [`coverage_variations`]: linear rescaling to standard coverage ratios

mod coverage;
mod price_range;
mod risk_matrix;

pub use coverage::{coverage_variations, COVERAGE_STEPS};
pub use price_range::PriceRange;
pub use risk_matrix::{
    expected_value, RangeOutcome, RiskMatrixEngine, RiskMatrixResult, StrategyConfig,
};
