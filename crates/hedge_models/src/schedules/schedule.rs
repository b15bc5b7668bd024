//! Dated hedge periods.

use chrono::NaiveDate;
use hedge_core::types::time::{month_end_after, time_to_maturity};
use hedge_core::types::PeriodKey;

use super::error::ScheduleError;
use crate::instruments::{HedgeParams, Horizon};

/// One settlement period of the hedge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HedgePeriod {
    /// Position in chronological order.
    pub index: usize,
    /// Override-map key.
    pub key: PeriodKey,
    /// Maturity date.
    pub maturity: NaiveDate,
    /// Act/365 years from the start date, never negative.
    pub time_to_maturity: f64,
    /// Volume settling at maturity.
    pub volume: f64,
}

/// Hedge parameters expanded into chronologically ordered periods.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hedge_models::instruments::{HedgeParams, Horizon};
/// use hedge_models::schedules::HedgeSchedule;
///
/// let params = HedgeParams {
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     horizon: Horizon::Months(3),
///     interest_rate: 2.0,
///     total_volume: 300.0,
///     spot_price: 1.1,
/// };
/// let schedule = HedgeSchedule::build(&params).unwrap();
/// assert_eq!(schedule.len(), 3);
/// assert_eq!(schedule.periods()[0].maturity, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
/// assert_eq!(schedule.periods()[2].volume, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HedgeSchedule {
    start_date: NaiveDate,
    spot: f64,
    rate: f64,
    periods: Vec<HedgePeriod>,
}

impl HedgeSchedule {
    /// Expands `params` into periods.
    ///
    /// Monthly horizons mature on consecutive month-ends beginning with the
    /// start month and split `total_volume` evenly. Custom periods are sorted
    /// by maturity.
    pub fn build(params: &HedgeParams) -> Result<Self, ScheduleError> {
        if !(params.spot_price.is_finite() && params.spot_price > 0.0) {
            return Err(ScheduleError::InvalidSpot {
                spot: params.spot_price,
            });
        }
        if !params.interest_rate.is_finite() {
            return Err(ScheduleError::InvalidRate {
                rate: params.interest_rate,
            });
        }

        let start = params.start_date;
        let mut dated: Vec<(NaiveDate, f64)> = match &params.horizon {
            Horizon::Months(0) => return Err(ScheduleError::EmptyHorizon),
            Horizon::Months(n) => {
                check_volume(params.total_volume)?;
                let volume = params.total_volume / f64::from(*n);
                (0..*n)
                    .map(|i| {
                        month_end_after(start, i)
                            .map(|d| (d, volume))
                            .ok_or(ScheduleError::DateOverflow)
                    })
                    .collect::<Result<_, _>>()?
            }
            Horizon::Custom(list) if list.is_empty() => return Err(ScheduleError::EmptyHorizon),
            Horizon::Custom(list) => list
                .iter()
                .map(|p| {
                    check_volume(p.volume)?;
                    if p.maturity < start {
                        return Err(ScheduleError::MaturityBeforeStart {
                            maturity: p.maturity,
                            start,
                        });
                    }
                    Ok((p.maturity, p.volume))
                })
                .collect::<Result<_, _>>()?,
        };
        dated.sort_by_key(|(d, _)| *d);

        let periods = dated
            .into_iter()
            .enumerate()
            .map(|(index, (maturity, volume))| HedgePeriod {
                index,
                key: PeriodKey::from_date(maturity),
                maturity,
                time_to_maturity: time_to_maturity(start, maturity).max(0.0),
                volume,
            })
            .collect();

        Ok(Self {
            start_date: start,
            spot: params.spot_price,
            rate: params.rate(),
            periods,
        })
    }

    /// Start date.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Spot at the start date.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Decimal rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Periods in chronological order.
    pub fn periods(&self) -> &[HedgePeriod] {
        &self.periods
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the schedule has no periods; never true for a built schedule.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Time to the last maturity.
    pub fn horizon_years(&self) -> f64 {
        self.periods
            .iter()
            .map(|p| p.time_to_maturity)
            .fold(0.0, f64::max)
    }

    /// Sum of period volumes.
    pub fn total_volume(&self) -> f64 {
        self.periods.iter().map(|p| p.volume).sum()
    }

    /// Times to maturity in period order.
    pub fn period_times(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.time_to_maturity).collect()
    }
}

fn check_volume(volume: f64) -> Result<(), ScheduleError> {
    if volume.is_finite() && volume >= 0.0 {
        Ok(())
    } else {
        Err(ScheduleError::InvalidVolume { volume })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::CustomPeriod;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn params(horizon: Horizon) -> HedgeParams {
        HedgeParams {
            start_date: d(2025, 1, 1),
            horizon,
            interest_rate: 3.0,
            total_volume: 1_200_000.0,
            spot_price: 1.1,
        }
    }

    #[test]
    fn test_monthly_schedule() {
        let s = HedgeSchedule::build(&params(Horizon::Months(12))).unwrap();
        assert_eq!(s.len(), 12);
        assert_eq!(s.periods()[0].maturity, d(2025, 1, 31));
        assert_eq!(s.periods()[11].maturity, d(2025, 12, 31));
        assert_eq!(s.periods()[1].key.to_string(), "2025-2");
        assert_relative_eq!(s.periods()[0].time_to_maturity, 30.0 / 365.0);
        assert_relative_eq!(s.horizon_years(), 364.0 / 365.0);
        assert_relative_eq!(s.total_volume(), 1_200_000.0);
        assert!(s.periods().iter().all(|p| p.volume == 100_000.0));
        assert_relative_eq!(s.rate(), 0.03);
    }

    #[test]
    fn test_custom_periods_are_sorted() {
        let s = HedgeSchedule::build(&params(Horizon::Custom(vec![
            CustomPeriod {
                maturity: d(2025, 9, 30),
                volume: 30.0,
            },
            CustomPeriod {
                maturity: d(2025, 3, 31),
                volume: 10.0,
            },
        ])))
        .unwrap();
        assert_eq!(s.periods()[0].maturity, d(2025, 3, 31));
        assert_eq!(s.periods()[0].index, 0);
        assert_eq!(s.periods()[1].volume, 30.0);
        assert_relative_eq!(s.total_volume(), 40.0);
    }

    #[test]
    fn test_maturity_on_start_date_has_zero_time() {
        let s = HedgeSchedule::build(&params(Horizon::Custom(vec![CustomPeriod {
            maturity: d(2025, 1, 1),
            volume: 5.0,
        }])))
        .unwrap();
        assert_eq!(s.periods()[0].time_to_maturity, 0.0);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            HedgeSchedule::build(&params(Horizon::Months(0))),
            Err(ScheduleError::EmptyHorizon)
        );
        assert_eq!(
            HedgeSchedule::build(&params(Horizon::Custom(vec![]))),
            Err(ScheduleError::EmptyHorizon)
        );
        assert!(matches!(
            HedgeSchedule::build(&params(Horizon::Custom(vec![CustomPeriod {
                maturity: d(2024, 12, 31),
                volume: 1.0,
            }]))),
            Err(ScheduleError::MaturityBeforeStart { .. })
        ));
        let mut p = params(Horizon::Months(3));
        p.total_volume = -1.0;
        assert!(matches!(
            HedgeSchedule::build(&p),
            Err(ScheduleError::InvalidVolume { .. })
        ));
        p.total_volume = 1.0;
        p.spot_price = 0.0;
        assert!(matches!(
            HedgeSchedule::build(&p),
            Err(ScheduleError::InvalidSpot { .. })
        ));
    }

    #[test]
    fn test_zero_volume_is_allowed() {
        let mut p = params(Horizon::Months(2));
        p.total_volume = 0.0;
        let s = HedgeSchedule::build(&p).unwrap();
        assert_eq!(s.total_volume(), 0.0);
    }
}
