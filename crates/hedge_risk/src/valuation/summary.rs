//! Yearly and total aggregation of period results.

use std::collections::BTreeMap;

use super::valuator::PeriodResult;

/// Sums over a group of periods.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostSummary {
    /// Σ hedged cost.
    pub hedged_cost: f64,
    /// Σ unhedged cost.
    pub unhedged_cost: f64,
    /// Σ ΔP&L.
    pub delta_pnl: f64,
    /// Σ strategy price × volume.
    pub strategy_premium: f64,
    /// Σ volume.
    pub volume: f64,
}

impl CostSummary {
    /// ΔP&L as a percentage of the absolute unhedged cost; `None` when the
    /// unhedged cost is zero.
    pub fn cost_reduction(&self) -> Option<f64> {
        (self.unhedged_cost != 0.0).then(|| self.delta_pnl / self.unhedged_cost.abs() * 100.0)
    }

    fn add(&mut self, period: &PeriodResult) {
        self.hedged_cost += period.hedged_cost;
        self.unhedged_cost += period.unhedged_cost;
        self.delta_pnl += period.delta_pnl;
        self.strategy_premium += period.strategy_price * period.monthly_volume;
        self.volume += period.monthly_volume;
    }
}

/// Summary of one calendar year.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearlySummary {
    /// Calendar year of the maturities.
    pub year: i32,
    /// Sums over the year's periods.
    pub costs: CostSummary,
}

/// Groups `periods` by maturity year, in ascending year order, and sums the
/// whole horizon.
pub fn summarise(periods: &[PeriodResult]) -> (Vec<YearlySummary>, CostSummary) {
    let mut years: BTreeMap<i32, CostSummary> = BTreeMap::new();
    let mut total = CostSummary::default();
    for period in periods {
        years.entry(period.key.year()).or_default().add(period);
        total.add(period);
    }
    let yearly = years
        .into_iter()
        .map(|(year, costs)| YearlySummary { year, costs })
        .collect();
    (yearly, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use hedge_core::types::PeriodKey;

    fn period(y: i32, m: u32, hedged: f64, unhedged: f64) -> PeriodResult {
        let date = NaiveDate::from_ymd_opt(y, m, 28).unwrap();
        PeriodResult {
            date,
            key: PeriodKey::from_date(date),
            time_to_maturity: 0.5,
            forward: 1.0,
            realized: 1.0,
            legs: Vec::new(),
            strategy_price: 0.02,
            total_payoff: 0.0,
            monthly_volume: 100.0,
            hedged_cost: hedged,
            unhedged_cost: unhedged,
            delta_pnl: hedged - unhedged,
        }
    }

    #[test]
    fn test_groups_by_year() {
        let periods = [
            period(2025, 11, -90.0, -100.0),
            period(2025, 12, -95.0, -100.0),
            period(2026, 1, -105.0, -100.0),
        ];
        let (yearly, total) = summarise(&periods);
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].year, 2025);
        assert_relative_eq!(yearly[0].costs.delta_pnl, 15.0);
        assert_relative_eq!(yearly[1].costs.delta_pnl, -5.0);
        assert_relative_eq!(total.delta_pnl, 10.0);
        assert_relative_eq!(total.strategy_premium, 6.0);
        assert_relative_eq!(total.cost_reduction().unwrap(), 10.0 / 300.0 * 100.0);
    }

    #[test]
    fn test_premium_is_price_times_full_volume() {
        let mut p = period(2025, 3, -1.0, -1.0);
        p.strategy_price = 0.0335;
        p.monthly_volume = 50_000.0;
        let (yearly, total) = summarise(&[p.clone(), p]);
        assert_relative_eq!(total.strategy_premium, 3_350.0, epsilon = 1e-9);
        assert_relative_eq!(yearly[0].costs.strategy_premium, total.strategy_premium);
    }

    #[test]
    fn test_zero_unhedged_has_no_reduction() {
        let (_, total) = summarise(&[period(2025, 3, 0.0, 0.0)]);
        assert_eq!(total.cost_reduction(), None);
        let (yearly, total) = summarise(&[]);
        assert!(yearly.is_empty());
        assert_eq!(total, CostSummary::default());
    }
}
