//! Strategy legs, hedge parameters and override maps.

pub mod leg;
pub mod overrides;
pub mod params;

pub use leg::{
    BarrierMode, BarrierShape, LegType, Level, LevelUnit, OptionKind, ResolvedLeg, StrategyLeg,
};
pub use overrides::Overrides;
pub use params::{CustomPeriod, HedgeParams, Horizon};
