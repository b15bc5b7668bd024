//! Closed-form option pricing.
//!
//! - [`BlackScholes`]: European calls and puts on a non-dividend underlying
//! - [`barrier_price`]: continuously monitored single barriers (Haug)

pub mod barrier;
pub mod black_scholes;
pub mod error;

pub use barrier::{barrier_price, BarrierDirection, BarrierParams, KnockType};
pub use black_scholes::{BlackScholes, OptionType};
pub use error::AnalyticalError;
