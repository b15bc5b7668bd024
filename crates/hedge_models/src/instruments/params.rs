//! Hedge parameters.

use chrono::NaiveDate;

/// Explicit maturity and volume of one period.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomPeriod {
    /// Maturity date.
    pub maturity: NaiveDate,
    /// Volume settling at maturity.
    pub volume: f64,
}

/// How the hedge horizon is laid out.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Horizon {
    /// Consecutive month-ends starting with the start month, total volume split evenly.
    Months(u32),
    /// Caller-supplied periods.
    Custom(Vec<CustomPeriod>),
}

/// Inputs describing the exposure being hedged.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hedge_models::instruments::{HedgeParams, Horizon};
///
/// let params = HedgeParams {
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     horizon: Horizon::Months(12),
///     interest_rate: 2.0,
///     total_volume: 1_200_000.0,
///     spot_price: 1.10,
/// };
/// assert!((params.rate() - 0.02).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HedgeParams {
    /// Valuation and hedge start date.
    pub start_date: NaiveDate,
    /// Period layout.
    pub horizon: Horizon,
    /// Annual interest rate in percent.
    pub interest_rate: f64,
    /// Total volume across all periods (ignored by custom periods).
    pub total_volume: f64,
    /// Spot price at the start date.
    pub spot_price: f64,
}

impl HedgeParams {
    /// Continuously compounded decimal rate.
    pub fn rate(&self) -> f64 {
        self.interest_rate / 100.0
    }
}
