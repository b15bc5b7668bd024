//! Expansion of hedge parameters into dated periods.

pub mod error;
pub mod schedule;

pub use error::ScheduleError;
pub use schedule::{HedgePeriod, HedgeSchedule};
