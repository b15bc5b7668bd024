//! Closed-form single-barrier options (Haug, continuous monitoring, no rebate).
//!
//! Knock-outs use the reflection-principle terms A, B, C, D with cost of carry
//! equal to the rate. Knock-ins follow from in-out parity:
//! **Knock-In + Knock-Out = Vanilla**.

use hedge_core::math::distributions::norm_cdf;

use super::black_scholes::{BlackScholes, OptionType, EXPIRY_EPSILON};
use super::error::AnalyticalError;

/// Side of the spot on which the barrier sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarrierDirection {
    /// Triggered when the underlying rises to the barrier.
    Up,
    /// Triggered when the underlying falls to the barrier.
    Down,
}

impl BarrierDirection {
    /// Whether `price` is on or beyond the barrier.
    #[inline]
    pub fn is_breached(self, price: f64, barrier: f64) -> bool {
        match self {
            BarrierDirection::Up => price >= barrier,
            BarrierDirection::Down => price <= barrier,
        }
    }
}

/// What touching the barrier does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnockType {
    /// Option comes alive on touch.
    In,
    /// Option dies on touch.
    Out,
}

/// Market and contract inputs for [`barrier_price`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarrierParams {
    /// Spot price.
    pub spot: f64,
    /// Strike.
    pub strike: f64,
    /// Barrier level.
    pub barrier: f64,
    /// Continuously compounded rate.
    pub rate: f64,
    /// Volatility.
    pub volatility: f64,
    /// Time to expiry in years.
    pub expiry: f64,
}

impl BarrierParams {
    fn validate(&self) -> Result<(), AnalyticalError> {
        if !(self.strike.is_finite() && self.strike > 0.0) {
            return Err(AnalyticalError::InvalidStrike {
                strike: self.strike,
            });
        }
        if !(self.barrier.is_finite() && self.barrier > 0.0) {
            return Err(AnalyticalError::InvalidBarrier {
                barrier: self.barrier,
            });
        }
        if !(self.expiry.is_finite() && self.expiry >= 0.0) {
            return Err(AnalyticalError::InvalidExpiry {
                expiry: self.expiry,
            });
        }
        Ok(())
    }
}

/// Prices a continuously monitored single-barrier option.
///
/// If the spot already sits on or beyond the barrier the knock event has
/// happened: knock-outs are worth zero and knock-ins are worth the vanilla.
///
/// # Errors
///
/// Any non-positive spot, strike, barrier or volatility, and negative expiry.
///
/// # Examples
/// ```
/// use hedge_models::analytical::{
///     barrier_price, BarrierDirection, BarrierParams, KnockType, OptionType,
/// };
///
/// let p = BarrierParams {
///     spot: 100.0, strike: 100.0, barrier: 90.0,
///     rate: 0.02, volatility: 0.2, expiry: 1.0,
/// };
/// let dao = barrier_price(OptionType::Call, BarrierDirection::Down, KnockType::Out, &p).unwrap();
/// assert!((dao - 7.3004).abs() < 1e-3);
/// ```
pub fn barrier_price(
    option_type: OptionType,
    direction: BarrierDirection,
    knock: KnockType,
    params: &BarrierParams,
) -> Result<f64, AnalyticalError> {
    params.validate()?;
    let bs = BlackScholes::new(params.spot, params.rate, params.volatility)?;
    let vanilla = bs.price(option_type, params.strike, params.expiry);

    let knocked_out = if direction.is_breached(params.spot, params.barrier) {
        0.0
    } else if params.expiry <= EXPIRY_EPSILON {
        option_type.intrinsic(params.spot, params.strike)
    } else {
        knock_out(option_type, direction, params).max(0.0).min(vanilla)
    };

    Ok(match knock {
        KnockType::Out => knocked_out,
        KnockType::In => (vanilla - knocked_out).max(0.0),
    })
}

/// Haug's A-D building blocks for a given φ (call = 1, put = −1) and η (down = 1, up = −1).
struct Terms {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

fn terms(phi: f64, eta: f64, p: &BarrierParams) -> Terms {
    let BarrierParams {
        spot: s,
        strike: k,
        barrier: h,
        rate: r,
        volatility: v,
        expiry: t,
    } = *p;

    let vst = v * t.sqrt();
    let mu = (r - 0.5 * v * v) / (v * v);
    let shift = (1.0 + mu) * vst;
    let df = (-r * t).exp();

    let x1 = (s / k).ln() / vst + shift;
    let x2 = (s / h).ln() / vst + shift;
    let y1 = (h * h / (s * k)).ln() / vst + shift;
    let y2 = (h / s).ln() / vst + shift;

    let hs = h / s;
    let refl_s = hs.powf(2.0 * (mu + 1.0));
    let refl_k = hs.powf(2.0 * mu);

    let straight =
        |x: f64| phi * s * norm_cdf(phi * x) - phi * k * df * norm_cdf(phi * x - phi * vst);
    let reflected = |y: f64| {
        phi * s * refl_s * norm_cdf(eta * y)
            - phi * k * df * refl_k * norm_cdf(eta * y - eta * vst)
    };

    Terms {
        a: straight(x1),
        b: straight(x2),
        c: reflected(y1),
        d: reflected(y2),
    }
}

fn knock_out(option_type: OptionType, direction: BarrierDirection, p: &BarrierParams) -> f64 {
    let strike_above = p.strike > p.barrier;
    match (option_type, direction) {
        (OptionType::Call, BarrierDirection::Down) => {
            let t = terms(1.0, 1.0, p);
            if strike_above {
                t.a - t.c
            } else {
                t.b - t.d
            }
        }
        (OptionType::Call, BarrierDirection::Up) => {
            if strike_above {
                0.0
            } else {
                let t = terms(1.0, -1.0, p);
                t.a - t.b + t.c - t.d
            }
        }
        (OptionType::Put, BarrierDirection::Down) => {
            if strike_above {
                let t = terms(-1.0, 1.0, p);
                t.a - t.b + t.c - t.d
            } else {
                0.0
            }
        }
        (OptionType::Put, BarrierDirection::Up) => {
            let t = terms(-1.0, -1.0, p);
            if strike_above {
                t.b - t.d
            } else {
                t.a - t.c
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(strike: f64, barrier: f64) -> BarrierParams {
        BarrierParams {
            spot: 100.0,
            strike,
            barrier,
            rate: 0.02,
            volatility: 0.2,
            expiry: 1.0,
        }
    }

    fn price(o: OptionType, d: BarrierDirection, k: KnockType, p: &BarrierParams) -> f64 {
        barrier_price(o, d, k, p).unwrap()
    }

    // ==========================================================
    // Reference values
    // ==========================================================

    #[test]
    fn test_down_and_out_call_strike_above_barrier() {
        let p = params(100.0, 90.0);
        let v = price(OptionType::Call, BarrierDirection::Down, KnockType::Out, &p);
        assert_relative_eq!(v, 7.300_447, epsilon = 1e-4);
    }

    #[test]
    fn test_down_and_out_call_strike_below_barrier() {
        let p = params(95.0, 97.0);
        let v = price(OptionType::Call, BarrierDirection::Down, KnockType::Out, &p);
        assert_relative_eq!(v, 3.662_509, epsilon = 1e-4);
    }

    #[test]
    fn test_up_and_out_call() {
        let p = params(100.0, 120.0);
        let v = price(OptionType::Call, BarrierDirection::Up, KnockType::Out, &p);
        assert_relative_eq!(v, 1.141_047, epsilon = 1e-4);
    }

    #[test]
    fn test_down_and_out_put() {
        let p = params(100.0, 90.0);
        let v = price(OptionType::Put, BarrierDirection::Down, KnockType::Out, &p);
        assert_relative_eq!(v, 0.163_962, epsilon = 1e-4);
    }

    #[test]
    fn test_up_and_out_put_both_branches() {
        let v = price(
            OptionType::Put,
            BarrierDirection::Up,
            KnockType::Out,
            &params(100.0, 110.0),
        );
        assert_relative_eq!(v, 5.302_686, epsilon = 1e-4);
        let v = price(
            OptionType::Put,
            BarrierDirection::Up,
            KnockType::Out,
            &params(110.0, 105.0),
        );
        assert_relative_eq!(v, 5.249_236, epsilon = 1e-4);
    }

    #[test]
    fn test_up_and_out_call_strike_above_barrier_is_worthless() {
        let p = params(130.0, 120.0);
        assert_eq!(
            price(OptionType::Call, BarrierDirection::Up, KnockType::Out, &p),
            0.0
        );
    }

    // ==========================================================
    // Parity and boundaries
    // ==========================================================

    #[test]
    fn test_in_out_parity() {
        let bs = BlackScholes::new(100.0, 0.02, 0.2).unwrap();
        for (o, d, k, h) in [
            (OptionType::Call, BarrierDirection::Up, 100.0, 120.0),
            (OptionType::Call, BarrierDirection::Down, 100.0, 90.0),
            (OptionType::Put, BarrierDirection::Down, 100.0, 85.0),
            (OptionType::Put, BarrierDirection::Up, 95.0, 115.0),
        ] {
            let p = params(k, h);
            let out = price(o, d, KnockType::Out, &p);
            let inn = price(o, d, KnockType::In, &p);
            assert_relative_eq!(out + inn, bs.price(o, k, 1.0), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_spot_beyond_barrier() {
        let p = params(100.0, 105.0);
        assert_eq!(
            price(OptionType::Call, BarrierDirection::Down, KnockType::Out, &p),
            0.0
        );
        let vanilla = BlackScholes::new(100.0, 0.02, 0.2)
            .unwrap()
            .price_call(100.0, 1.0);
        assert_relative_eq!(
            price(OptionType::Call, BarrierDirection::Down, KnockType::In, &p),
            vanilla
        );
    }

    #[test]
    fn test_expired_unbreached_pays_intrinsic() {
        let mut p = params(95.0, 90.0);
        p.expiry = 0.0;
        assert_relative_eq!(
            price(OptionType::Call, BarrierDirection::Down, KnockType::Out, &p),
            5.0
        );
        assert_relative_eq!(
            price(OptionType::Call, BarrierDirection::Down, KnockType::In, &p),
            0.0
        );
    }

    #[test]
    fn test_knock_out_bounded_by_vanilla() {
        let bs = BlackScholes::new(100.0, 0.02, 0.2).unwrap();
        for &h in &[50.0, 80.0, 95.0, 99.9] {
            let out = price(
                OptionType::Call,
                BarrierDirection::Down,
                KnockType::Out,
                &params(100.0, h),
            );
            assert!(out <= bs.price_call(100.0, 1.0) + 1e-12);
            assert!(out >= 0.0);
        }
    }

    #[test]
    fn test_rejects_invalid_barrier() {
        let p = params(100.0, -1.0);
        assert!(matches!(
            barrier_price(OptionType::Call, BarrierDirection::Down, KnockType::Out, &p),
            Err(AnalyticalError::InvalidBarrier { .. })
        ));
    }
}
