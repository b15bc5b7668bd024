//! Strategy legs.
//!
//! A leg's type is the product of three orthogonal choices: the base
//! instrument, whether a barrier knocks it in or out, and where the barrier
//! sits. At the serialisation boundary the type travels as a hyphenated tag
//! such as `"call-double-knockout"`.

use std::fmt;
use std::str::FromStr;

use hedge_core::types::PricingError;

use crate::analytical::{BarrierDirection, KnockType, OptionType};

/// Base instrument of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Vanilla call.
    Call,
    /// Vanilla put.
    Put,
    /// Forward swap at the horizon-average forward.
    Swap,
}

/// Barrier effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarrierMode {
    /// No barrier.
    #[default]
    None,
    /// Dies once the barrier is touched.
    KnockOut,
    /// Comes alive once the barrier is touched.
    KnockIn,
}

/// Barrier placement.
///
/// A standard call barrier is an up barrier and a standard put barrier a down
/// barrier; `Reverse` flips the side. `Double` uses two levels and triggers
/// outside the corridor between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarrierShape {
    /// Conventional side for the option type.
    #[default]
    Standard,
    /// Opposite side.
    Reverse,
    /// Corridor between two levels.
    Double,
}

/// Tagged leg type.
///
/// # Examples
/// ```
/// use hedge_models::instruments::{BarrierMode, BarrierShape, LegType, OptionKind};
///
/// let t: LegType = "call-double-knockout".parse().unwrap();
/// assert_eq!(t.kind, OptionKind::Call);
/// assert_eq!(t.barrier_mode, BarrierMode::KnockOut);
/// assert_eq!(t.barrier_shape, BarrierShape::Double);
/// assert_eq!(t.to_string(), "call-double-knockout");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct LegType {
    /// Base instrument.
    pub kind: OptionKind,
    /// Barrier effect.
    pub barrier_mode: BarrierMode,
    /// Barrier placement; ignored when `barrier_mode` is `None`.
    pub barrier_shape: BarrierShape,
}

impl LegType {
    /// Vanilla call.
    pub const CALL: LegType = LegType::vanilla(OptionKind::Call);
    /// Vanilla put.
    pub const PUT: LegType = LegType::vanilla(OptionKind::Put);
    /// Swap.
    pub const SWAP: LegType = LegType::vanilla(OptionKind::Swap);

    /// Leg without a barrier.
    pub const fn vanilla(kind: OptionKind) -> Self {
        Self {
            kind,
            barrier_mode: BarrierMode::None,
            barrier_shape: BarrierShape::Standard,
        }
    }

    /// Leg with a barrier.
    pub const fn barrier(kind: OptionKind, mode: BarrierMode, shape: BarrierShape) -> Self {
        Self {
            kind,
            barrier_mode: mode,
            barrier_shape: shape,
        }
    }

    /// Call or put; `None` for swaps.
    pub fn option_type(&self) -> Option<OptionType> {
        match self.kind {
            OptionKind::Call => Some(OptionType::Call),
            OptionKind::Put => Some(OptionType::Put),
            OptionKind::Swap => None,
        }
    }

    /// Whether the leg carries a barrier.
    pub fn is_barrier(&self) -> bool {
        self.option_type().is_some() && self.barrier_mode != BarrierMode::None
    }

    /// Knock type of a barrier leg.
    pub fn knock_type(&self) -> Option<KnockType> {
        match (self.is_barrier(), self.barrier_mode) {
            (true, BarrierMode::KnockOut) => Some(KnockType::Out),
            (true, BarrierMode::KnockIn) => Some(KnockType::In),
            _ => None,
        }
    }

    /// Side of a single barrier: standard call and reverse put sit above
    /// spot, standard put and reverse call below. `None` for double barriers
    /// and non-barrier legs.
    pub fn barrier_direction(&self) -> Option<BarrierDirection> {
        if !self.is_barrier() {
            return None;
        }
        match (self.kind, self.barrier_shape) {
            (_, BarrierShape::Double) | (OptionKind::Swap, _) => None,
            (OptionKind::Call, BarrierShape::Standard)
            | (OptionKind::Put, BarrierShape::Reverse) => Some(BarrierDirection::Up),
            (OptionKind::Put, BarrierShape::Standard)
            | (OptionKind::Call, BarrierShape::Reverse) => Some(BarrierDirection::Down),
        }
    }

    /// Whether a closed form exists: vanilla options and single barriers.
    pub fn supports_closed_form(&self) -> bool {
        match self.kind {
            OptionKind::Swap => false,
            OptionKind::Call | OptionKind::Put => {
                !self.is_barrier() || self.barrier_shape != BarrierShape::Double
            }
        }
    }

    /// Hyphenated tag, e.g. `"put-reverse-knockin"`.
    pub fn tag(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LegType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.kind {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
            OptionKind::Swap => "swap",
        };
        f.write_str(base)?;
        if !self.is_barrier() {
            return Ok(());
        }
        match self.barrier_shape {
            BarrierShape::Standard => {}
            BarrierShape::Reverse => f.write_str("-reverse")?,
            BarrierShape::Double => f.write_str("-double")?,
        }
        match self.barrier_mode {
            BarrierMode::KnockOut => f.write_str("-knockout"),
            BarrierMode::KnockIn => f.write_str("-knockin"),
            BarrierMode::None => Ok(()),
        }
    }
}

impl FromStr for LegType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.trim().split('-').map(str::to_ascii_lowercase);
        let kind = match tokens.next().as_deref() {
            Some("call") => OptionKind::Call,
            Some("put") => OptionKind::Put,
            Some("swap") => OptionKind::Swap,
            _ => return Err(PricingError::invalid(format!("unknown leg type '{s}'"))),
        };

        let mut mode = None;
        let mut shape = None;
        for token in tokens {
            let (repeated, what) = match token.as_str() {
                "knockout" => (mode.replace(BarrierMode::KnockOut).is_some(), "barrier mode"),
                "knockin" => (mode.replace(BarrierMode::KnockIn).is_some(), "barrier mode"),
                "standard" => (shape.replace(BarrierShape::Standard).is_some(), "barrier shape"),
                "reverse" => (shape.replace(BarrierShape::Reverse).is_some(), "barrier shape"),
                "double" => (shape.replace(BarrierShape::Double).is_some(), "barrier shape"),
                other => {
                    return Err(PricingError::invalid(format!(
                        "unknown leg type modifier '{other}' in '{s}'"
                    )))
                }
            };
            if repeated {
                return Err(PricingError::invalid(format!(
                    "more than one {what} in leg type '{s}'"
                )));
            }
        }
        let mut leg = LegType::vanilla(kind);
        leg.barrier_mode = mode.unwrap_or(BarrierMode::None);
        leg.barrier_shape = shape.unwrap_or(BarrierShape::Standard);
        if kind == OptionKind::Swap && leg.barrier_mode != BarrierMode::None {
            return Err(PricingError::invalid("swap legs cannot carry a barrier"));
        }
        if leg.barrier_mode == BarrierMode::None {
            leg.barrier_shape = BarrierShape::Standard;
        }
        Ok(leg)
    }
}

impl TryFrom<String> for LegType {
    type Error = PricingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LegType> for String {
    fn from(t: LegType) -> Self {
        t.to_string()
    }
}

/// How a strike or barrier level is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LevelUnit {
    /// Percent of the hedge spot price.
    #[default]
    Percent,
    /// Absolute price.
    Absolute,
}

/// Strike or barrier level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    /// Quoted value.
    pub value: f64,
    /// Quote convention.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: LevelUnit,
}

impl Level {
    /// Level quoted in percent of spot.
    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: LevelUnit::Percent,
        }
    }

    /// Level quoted as a price.
    pub fn absolute(value: f64) -> Self {
        Self {
            value,
            unit: LevelUnit::Absolute,
        }
    }

    /// Absolute price for the given spot.
    pub fn resolve(&self, spot: f64) -> f64 {
        match self.unit {
            LevelUnit::Percent => spot * self.value / 100.0,
            LevelUnit::Absolute => self.value,
        }
    }
}

/// One leg of a hedging strategy as supplied by the caller.
///
/// Volatility and quantity are in percent; a negative quantity is a sold leg.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyLeg {
    /// Tagged type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub leg_type: LegType,
    /// Strike level.
    pub strike: Level,
    /// Volatility in percent.
    pub volatility: f64,
    /// Signed quantity in percent of the period volume.
    pub quantity: f64,
    /// Barrier level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub barrier: Option<Level>,
    /// Second level of a double barrier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub second_barrier: Option<Level>,
}

impl StrategyLeg {
    /// Leg without barrier levels.
    pub fn new(leg_type: LegType, strike: Level, volatility: f64, quantity: f64) -> Self {
        Self {
            leg_type,
            strike,
            volatility,
            quantity,
            barrier: None,
            second_barrier: None,
        }
    }

    /// Attaches barrier levels.
    pub fn with_barriers(mut self, barrier: Level, second: Option<Level>) -> Self {
        self.barrier = Some(barrier);
        self.second_barrier = second;
        self
    }

    /// Override-map key of the leg at position `index`, e.g. `"0-call-knockout"`.
    pub fn key(&self, index: usize) -> String {
        format!("{index}-{}", self.leg_type)
    }

    /// Resolves quoted levels against `spot` and converts percentages to decimals.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` when a barrier leg lacks its levels, a
    /// resolved level is not strictly positive, or a number is not finite.
    pub fn resolve(&self, spot: f64) -> Result<ResolvedLeg, PricingError> {
        if !(self.quantity.is_finite() && self.volatility.is_finite()) {
            return Err(PricingError::invalid(format!(
                "leg {} has non-finite quantity or volatility",
                self.leg_type
            )));
        }
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(v)
            } else {
                Err(PricingError::invalid(format!(
                    "leg {} {name} resolves to {v}",
                    self.leg_type
                )))
            }
        };

        let strike = match self.leg_type.kind {
            OptionKind::Swap => self.strike.resolve(spot),
            OptionKind::Call | OptionKind::Put => positive("strike", self.strike.resolve(spot))?,
        };

        let (barrier, second_barrier) = if self.leg_type.is_barrier() {
            let first = self.barrier.ok_or_else(|| {
                PricingError::invalid(format!("leg {} has no barrier", self.leg_type))
            })?;
            let first = positive("barrier", first.resolve(spot))?;
            let second = match self.leg_type.barrier_shape {
                BarrierShape::Double => {
                    let lvl = self.second_barrier.ok_or_else(|| {
                        let msg = format!("leg {} has no second barrier", self.leg_type);
                        PricingError::invalid(msg)
                    })?;
                    Some(positive("second barrier", lvl.resolve(spot))?)
                }
                BarrierShape::Standard | BarrierShape::Reverse => None,
            };
            (Some(first), second)
        } else {
            (None, None)
        };

        Ok(ResolvedLeg {
            leg_type: self.leg_type,
            strike,
            barrier,
            second_barrier,
            volatility: self.volatility / 100.0,
            weight: self.quantity / 100.0,
        })
    }
}

/// Leg with absolute levels and decimal volatility, ready for pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedLeg {
    /// Tagged type.
    pub leg_type: LegType,
    /// Absolute strike.
    pub strike: f64,
    /// Absolute barrier for barrier legs.
    pub barrier: Option<f64>,
    /// Absolute second barrier for double barriers.
    pub second_barrier: Option<f64>,
    /// Decimal volatility.
    pub volatility: f64,
    /// Signed quantity as a fraction of volume.
    pub weight: f64,
}

impl ResolvedLeg {
    /// Whether `price` meets this leg's barrier condition.
    ///
    /// Standard calls trigger at or above the barrier and standard puts at or
    /// below; reverse shapes flip the comparison; doubles trigger strictly
    /// outside the corridor. Non-barrier legs never trigger.
    pub fn is_touched(&self, price: f64) -> bool {
        let Some(barrier) = self.barrier else {
            return false;
        };
        if !self.leg_type.is_barrier() {
            return false;
        }
        match self.leg_type.barrier_direction() {
            Some(direction) => direction.is_breached(price, barrier),
            None => {
                let other = self.second_barrier.unwrap_or(barrier);
                price < barrier.min(other) || price > barrier.max(other)
            }
        }
    }

    /// Corridor `(lower, upper)` of a double barrier.
    pub fn corridor(&self) -> Option<(f64, f64)> {
        match (self.leg_type.barrier_shape, self.barrier, self.second_barrier) {
            (BarrierShape::Double, Some(a), Some(b)) if self.leg_type.is_barrier() => {
                Some((a.min(b), a.max(b)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tag_roundtrip_all_combinations() {
        for kind in [OptionKind::Call, OptionKind::Put] {
            for mode in [BarrierMode::KnockOut, BarrierMode::KnockIn] {
                for shape in [BarrierShape::Standard, BarrierShape::Reverse, BarrierShape::Double] {
                    let t = LegType::barrier(kind, mode, shape);
                    assert_eq!(t.to_string().parse::<LegType>().unwrap(), t);
                }
            }
        }
        assert_eq!("swap".parse::<LegType>().unwrap(), LegType::SWAP);
    }

    #[test]
    fn test_tag_parse_rejects_unknown() {
        assert!("straddle".parse::<LegType>().is_err());
        assert!("call-sideways".parse::<LegType>().is_err());
        assert!("swap-knockout".parse::<LegType>().is_err());
    }

    #[test]
    fn test_tag_parse_rejects_repeated_modifiers() {
        assert!("call-knockout-knockin".parse::<LegType>().is_err());
        assert!("put-knockout-knockout".parse::<LegType>().is_err());
        assert!("call-double-reverse-knockout".parse::<LegType>().is_err());
        assert_eq!(
            "call-standard-knockout".parse::<LegType>().unwrap(),
            "call-knockout".parse::<LegType>().unwrap()
        );
    }

    #[test]
    fn test_barrier_direction() {
        let dir = |s: &str| s.parse::<LegType>().unwrap().barrier_direction();
        assert_eq!(dir("call-knockout"), Some(BarrierDirection::Up));
        assert_eq!(dir("call-reverse-knockout"), Some(BarrierDirection::Down));
        assert_eq!(dir("put-knockin"), Some(BarrierDirection::Down));
        assert_eq!(dir("put-reverse-knockin"), Some(BarrierDirection::Up));
        assert_eq!(dir("put-double-knockin"), None);
        assert_eq!(dir("call"), None);
    }

    #[test]
    fn test_supports_closed_form() {
        assert!(LegType::CALL.supports_closed_form());
        assert!("put-reverse-knockout".parse::<LegType>().unwrap().supports_closed_form());
        assert!(!"call-double-knockin".parse::<LegType>().unwrap().supports_closed_form());
        assert!(!LegType::SWAP.supports_closed_form());
    }

    #[test]
    fn test_key_format() {
        let leg = StrategyLeg::new(
            "call-knockout".parse().unwrap(),
            Level::percent(100.0),
            20.0,
            100.0,
        );
        assert_eq!(leg.key(0), "0-call-knockout");
    }

    #[test]
    fn test_resolve_levels() {
        let leg = StrategyLeg::new(
            "put-double-knockout".parse().unwrap(),
            Level::percent(95.0),
            12.5,
            -50.0,
        )
        .with_barriers(Level::absolute(1.30), Some(Level::percent(80.0)));
        let r = leg.resolve(1.25).unwrap();
        assert_relative_eq!(r.strike, 1.1875);
        assert_eq!(r.barrier, Some(1.30));
        assert_relative_eq!(r.second_barrier.unwrap(), 1.0);
        assert_relative_eq!(r.volatility, 0.125);
        assert_relative_eq!(r.weight, -0.5);
        assert_eq!(r.corridor(), Some((1.0, 1.30)));
    }

    #[test]
    fn test_resolve_requires_barrier_levels() {
        let atm = Level::percent(100.0);
        let leg = StrategyLeg::new("call-knockin".parse().unwrap(), atm, 20.0, 100.0);
        assert!(leg.resolve(100.0).is_err());
        let leg = StrategyLeg::new("call-double-knockin".parse().unwrap(), atm, 20.0, 100.0)
            .with_barriers(Level::percent(120.0), None);
        assert!(leg.resolve(100.0).is_err());
    }

    #[test]
    fn test_touch_rule() {
        let resolve = |tag: &str, b: f64, b2: Option<f64>| {
            StrategyLeg::new(tag.parse().unwrap(), Level::absolute(100.0), 20.0, 100.0)
                .with_barriers(Level::absolute(b), b2.map(Level::absolute))
                .resolve(100.0)
                .unwrap()
        };
        let up_call = resolve("call-knockout", 120.0, None);
        assert!(up_call.is_touched(120.0));
        assert!(!up_call.is_touched(119.9));

        let rev_call = resolve("call-reverse-knockout", 90.0, None);
        assert!(rev_call.is_touched(90.0));
        assert!(!rev_call.is_touched(95.0));

        let put = resolve("put-knockin", 85.0, None);
        assert!(put.is_touched(80.0));
        assert!(!put.is_touched(86.0));

        let dbl = resolve("call-double-knockout", 120.0, Some(80.0));
        assert!(!dbl.is_touched(80.0));
        assert!(!dbl.is_touched(120.0));
        assert!(dbl.is_touched(79.99));
        assert!(dbl.is_touched(120.01));

        let vanilla = StrategyLeg::new(LegType::CALL, Level::absolute(100.0), 20.0, 100.0)
            .resolve(100.0)
            .unwrap();
        assert!(!vanilla.is_touched(1e9));
    }
}
