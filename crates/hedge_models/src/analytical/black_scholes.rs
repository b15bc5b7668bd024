//! Black-Scholes pricing for European calls and puts.
//!
//! **Call**: C = S·N(d₁) − K·e^(−rT)·N(d₂)
//! **Put**: P = K·e^(−rT)·N(−d₂) − S·N(−d₁)
//!
//! with d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T) and d₂ = d₁ − σ√T.

use hedge_core::math::distributions::{norm_cdf, norm_pdf};

use super::error::AnalyticalError;

/// Expiries at or below this are treated as expired.
pub(crate) const EXPIRY_EPSILON: f64 = 1e-10;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// Exercise value at `price`.
    #[inline]
    pub fn intrinsic(self, price: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (price - strike).max(0.0),
            OptionType::Put => (strike - price).max(0.0),
        }
    }
}

/// Black-Scholes model on a non-dividend underlying.
///
/// # Examples
/// ```
/// use hedge_models::analytical::{BlackScholes, OptionType};
///
/// let bs = BlackScholes::new(100.0, 0.02, 0.2).unwrap();
/// let call = bs.price(OptionType::Call, 100.0, 1.0);
/// assert!((call - 8.916).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Creates a model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot is not strictly positive
    /// - `AnalyticalError::InvalidVolatility` if volatility is not strictly positive
    /// - `AnalyticalError::InvalidRate` if the rate is not finite
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(AnalyticalError::InvalidSpot { spot });
        }
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }
        if !rate.is_finite() {
            return Err(AnalyticalError::InvalidRate { rate });
        }
        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Spot price.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Continuously compounded rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// d₁ term. Requires `expiry > 0`.
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        ((self.spot / strike).ln() + (self.rate + 0.5 * self.volatility * self.volatility) * expiry)
            / vol_sqrt_t
    }

    /// d₂ = d₁ − σ√T.
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Call price, floored at zero. Expired options return intrinsic value.
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return OptionType::Call.intrinsic(self.spot, strike);
        }
        let df = (-self.rate * expiry).exp();
        let price = self.spot * norm_cdf(self.d1(strike, expiry))
            - strike * df * norm_cdf(self.d2(strike, expiry));
        price.max(0.0)
    }

    /// Put price, floored at zero. Expired options return intrinsic value.
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return OptionType::Put.intrinsic(self.spot, strike);
        }
        let df = (-self.rate * expiry).exp();
        let price = strike * df * norm_cdf(-self.d2(strike, expiry))
            - self.spot * norm_cdf(-self.d1(strike, expiry));
        price.max(0.0)
    }

    /// Price of `option_type`.
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        match option_type {
            OptionType::Call => self.price_call(strike, expiry),
            OptionType::Put => self.price_put(strike, expiry),
        }
    }

    /// Vega `S·√T·φ(d₁)`, identical for calls and puts. Zero once expired.
    pub fn vega(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }
        self.spot * expiry.sqrt() * norm_pdf(self.d1(strike, expiry))
    }
}
