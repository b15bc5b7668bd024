use crate::error::RiskError;

/// Price scenario: a band of settlement prices and its probability in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Probability weight in percent; ranges need not sum to 100.
    pub probability: f64,
}

impl PriceRange {
    /// Creates a validated range.
    pub fn new(min: f64, max: f64, probability: f64) -> Result<Self, RiskError> {
        let range = Self {
            min,
            max,
            probability,
        };
        range.validate()?;
        Ok(range)
    }

    /// Representative price of the band.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Checks bounds and probability.
    pub fn validate(&self) -> Result<(), RiskError> {
        let bounds_ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min <= self.max;
        if !bounds_ok {
            return Err(RiskError::InvalidPriceRange {
                min: self.min,
                max: self.max,
            });
        }
        if !(self.probability.is_finite() && self.probability >= 0.0) {
            return Err(RiskError::InvalidProbability(self.probability));
        }
        Ok(())
    }
}
