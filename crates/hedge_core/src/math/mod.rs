//! Mathematical building blocks shared by the pricing layers.

pub mod distributions;
pub mod solvers;
