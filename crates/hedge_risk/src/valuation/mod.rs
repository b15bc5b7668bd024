//! Strategy valuation over a hedge schedule.
//!
//! - [`payoff`]: leg payoffs and static payoff diagrams
//! - [`valuator`]: per-period pricing and cash flows
//! - [`summary`]: yearly and total aggregation

pub mod payoff;
pub mod summary;
pub mod valuator;

pub use payoff::{
    leg_payoff, payoff_diagram, static_payoff, strategy_static_payoff, PayoffPoint,
};
pub use summary::{summarise, CostSummary, YearlySummary};
pub use valuator::{
    forwards, period_cash_flows, swap_price, LegValuation, PeriodPricing, PeriodResult,
    PricedSchedule, StrategyValuator,
};
