//! Day-count and calendar helpers.

use chrono::{Datelike, Months, NaiveDate};

/// Days per year under Actual/365 Fixed.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Actual/365 year fraction from `start` to `end`.
///
/// Negative when `end` precedes `start`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hedge_core::types::time::time_to_maturity;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// assert!((time_to_maturity(start, end) - 1.0).abs() < 1e-12);
/// ```
pub fn time_to_maturity(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / DAYS_PER_YEAR
}

/// Last calendar day of the month that lies `offset` months after `date`'s month.
///
/// Returns `None` only when the result overflows chrono's date range.
pub fn month_end_after(date: NaiveDate, offset: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
    first
        .checked_add_months(Months::new(offset + 1))?
        .pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_act365() {
        assert_relative_eq!(time_to_maturity(d(2025, 1, 1), d(2025, 1, 31)), 30.0 / 365.0);
        assert!(time_to_maturity(d(2025, 2, 1), d(2025, 1, 1)) < 0.0);
    }

    #[test]
    fn test_month_end_after() {
        assert_eq!(month_end_after(d(2025, 1, 15), 0), Some(d(2025, 1, 31)));
        assert_eq!(month_end_after(d(2025, 1, 15), 1), Some(d(2025, 2, 28)));
        assert_eq!(month_end_after(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(month_end_after(d(2025, 11, 1), 2), Some(d(2026, 1, 31)));
    }
}
