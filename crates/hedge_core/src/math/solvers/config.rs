//! Solver configuration.

/// Tolerance and iteration limits shared by the root finders.
///
/// # Example
///
/// ```
/// use hedge_core::math::solvers::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.max_iterations, 100);
///
/// let calibration = SolverConfig::new(1e-4, 100);
/// assert_eq!(calibration.tolerance, 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// The solver stops once `|f(x)| < tolerance`.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    /// `tolerance = 1e-10`, `max_iterations = 100`.
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration. Non-positive tolerances fall back to the default
    /// and a zero iteration cap is raised to one.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        let tolerance = if tolerance > 0.0 && tolerance.is_finite() {
            tolerance
        } else {
            Self::default().tolerance
        };
        Self {
            tolerance,
            max_iterations: max_iterations.max(1),
        }
    }
}
