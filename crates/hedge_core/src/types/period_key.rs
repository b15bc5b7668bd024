//! Calendar-month keys used by override maps.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use super::PricingError;

/// Year/month key rendered as `"YYYY-M"` (month not zero-padded, e.g. `"2025-3"`).
///
/// Override maps for forwards, realized prices, implied volatilities and custom
/// option prices are all keyed by the month of the period's maturity date.
///
/// # Examples
/// ```
/// use hedge_core::types::PeriodKey;
///
/// let key: PeriodKey = "2026-11".parse().unwrap();
/// assert_eq!(key.year(), 2026);
/// assert_eq!(key.month(), 11);
/// assert_eq!(key.to_string(), "2026-11");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    /// Builds a key, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, PricingError> {
        if !(1..=12).contains(&month) {
            return Err(PricingError::invalid(format!(
                "period month {month} outside 1..=12"
            )));
        }
        Ok(Self { year, month })
    }

    /// Key of the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Owned `"YYYY-M"` rendering.
    pub fn as_str(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || PricingError::invalid(format!("malformed period key '{s}', expected YYYY-M"));
        let (y, m) = s.trim().rsplit_once('-').ok_or_else(bad)?;
        let year = y.parse::<i32>().map_err(|_| bad())?;
        let month = m.parse::<u32>().map_err(|_| bad())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PricingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}
