//! Uniform grid search for one-dimensional minimisation.

use crate::types::SolverError;

/// Minimiser over an evenly spaced grid `lower, lower + h, ..., upper`.
///
/// Intended for objectives with no usable derivative, such as inverting a
/// Monte Carlo price. The grid has `steps + 1` points, both ends inclusive.
///
/// # Example
///
/// ```
/// use hedge_core::math::solvers::GridSearch;
///
/// let grid = GridSearch::new(0.0, 1.0, 10).unwrap();
/// let best = grid.minimise(|x| (x - 0.3).abs());
/// assert!((best.x - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSearch {
    lower: f64,
    upper: f64,
    steps: usize,
}

/// Best grid point found by [`GridSearch::minimise`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// Abscissa of the minimum.
    pub x: f64,
    /// Objective value at `x`.
    pub value: f64,
}

impl GridSearch {
    /// Creates a grid over `[lower, upper]` split into `steps` intervals.
    ///
    /// # Errors
    ///
    /// `SolverError::NoBracket` if the interval is empty or not finite, and
    /// `SolverError::NumericalInstability` if `steps == 0`.
    pub fn new(lower: f64, upper: f64, steps: usize) -> Result<Self, SolverError> {
        if !(lower.is_finite() && upper.is_finite()) || lower >= upper {
            return Err(SolverError::NoBracket { a: lower, b: upper });
        }
        if steps == 0 {
            return Err(SolverError::NumericalInstability(
                "grid search needs at least one step".to_string(),
            ));
        }
        Ok(Self {
            lower,
            upper,
            steps,
        })
    }

    /// Number of grid points evaluated.
    pub fn len(&self) -> usize {
        self.steps + 1
    }

    /// Always false; a valid grid holds at least two points.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Grid abscissae in ascending order.
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        let h = (self.upper - self.lower) / self.steps as f64;
        (0..=self.steps).map(move |i| {
            if i == self.steps {
                self.upper
            } else {
                self.lower + h * i as f64
            }
        })
    }

    /// Evaluates `objective` at every grid point and returns the smallest.
    ///
    /// Non-finite objective values are skipped. Ties keep the lower abscissa.
    /// If every value is non-finite the lower bound is returned with an
    /// infinite value.
    pub fn minimise<F>(&self, objective: F) -> GridPoint
    where
        F: Fn(f64) -> f64,
    {
        self.points().fold(
            GridPoint {
                x: self.lower,
                value: f64::INFINITY,
            },
            |best, x| {
                let value = objective(x);
                if value.is_finite() && value < best.value {
                    GridPoint { x, value }
                } else {
                    best
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_empty_interval() {
        assert!(GridSearch::new(1.0, 1.0, 10).is_err());
        assert!(GridSearch::new(0.0, 1.0, 0).is_err());
        assert!(GridSearch::new(f64::NAN, 1.0, 5).is_err());
    }

    #[test]
    fn test_point_count_is_inclusive() {
        let grid = GridSearch::new(0.01, 1.0, 50).unwrap();
        let points: Vec<f64> = grid.points().collect();
        assert_eq!(points.len(), 51);
        assert_eq!(grid.len(), 51);
        assert_relative_eq!(points[0], 0.01);
        assert_relative_eq!(points[50], 1.0);
        assert_relative_eq!(points[1] - points[0], 0.0198, epsilon = 1e-12);
    }

    #[test]
    fn test_minimise_picks_nearest_point() {
        let grid = GridSearch::new(0.01, 1.0, 50).unwrap();
        let best = grid.minimise(|x| (x - 0.25).abs());
        // Grid points are 0.01 + 0.0198 k; k = 12 gives 0.2476.
        assert_relative_eq!(best.x, 0.2476, epsilon = 1e-12);
    }

    #[test]
    fn test_minimise_skips_nan() {
        let grid = GridSearch::new(0.0, 1.0, 4).unwrap();
        let best = grid.minimise(|x| if x < 0.5 { f64::NAN } else { x });
        assert_relative_eq!(best.x, 0.5);
    }
}
