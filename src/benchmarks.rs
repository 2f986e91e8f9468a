//! Standard continuous benchmark objectives.
//!
//! All are minimised with a global minimum of `0.0`: at the origin for
//! [`sphere`], [`rastrigin`], and [`ackley`], at `(1, …, 1)` for
//! [`rosenbrock`]. They plug straight into
//! [`ObjectiveFn`](crate::ga::ObjectiveFn).
//!
//! # References
//!
//! - Rastrigin (1974), *Systems of Extremal Control*
//! - Ackley (1987), *A Connectionist Machine for Genetic Hillclimbing*
//! - Rosenbrock (1960), "An Automatic Method for Finding the Greatest or Least Value of a Function"

use std::f64::consts::{E, PI};

/// Rastrigin amplitude.
pub const RASTRIGIN_A: f64 = 10.0;

/// Sum of squares.
///
/// ```
/// assert_eq!(u_evolve::benchmarks::sphere(&[1.0, -2.0]), 5.0);
/// ```
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

/// `A·n + Σ (xᵢ² − A·cos(2πxᵢ))` with `A = 10`.
pub fn rastrigin(x: &[f64]) -> f64 {
    RASTRIGIN_A * x.len() as f64
        + x.iter()
            .map(|v| v * v - RASTRIGIN_A * (2.0 * PI * v).cos())
            .sum::<f64>()
}

/// Two-dimensional Ackley function over `x[0]` and `x[1]`.
///
/// Components past the second are ignored.
///
/// # Panics
/// Panics if `x` has fewer than two components.
pub fn ackley(x: &[f64]) -> f64 {
    let (a, b) = (x[0], x[1]);
    -20.0 * (-0.2 * (0.5 * (a * a + b * b)).sqrt()).exp()
        - (0.5 * ((2.0 * PI * a).cos() + (2.0 * PI * b).cos())).exp()
        + E
        + 20.0
}

/// `Σ 100(xᵢ₊₁ − xᵢ²)² + (1 − xᵢ)²`.
pub fn rosenbrock(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_minima() {
        assert_eq!(sphere(&[0.0; 5]), 0.0);
        assert!(rastrigin(&[0.0; 4]).abs() < 1e-12);
        assert!(ackley(&[0.0, 0.0]).abs() < 1e-12);
        assert_eq!(rosenbrock(&[1.0; 6]), 0.0);
    }

    #[test]
    fn test_known_values() {
        assert!((sphere(&[5.0, 5.0, 5.0]) - 75.0).abs() < 1e-10);
        // Integer points: cos(2πk) = 1.
        assert!((rastrigin(&[1.0, 2.0]) - 5.0).abs() < 1e-10);
        assert!((rosenbrock(&[0.0, 0.0]) - 1.0).abs() < 1e-10);
        assert!((rosenbrock(&[-1.0, 1.0, 1.0]) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ackley_positive_away_from_origin() {
        for p in [[1.0, 0.0], [0.5, -0.5], [3.0, 3.0]] {
            assert!(ackley(&p) > 0.0);
        }
        assert_eq!(ackley(&[1.0, 2.0, 99.0]), ackley(&[1.0, 2.0]));
    }

    #[test]
    fn test_rastrigin_local_minima_are_worse() {
        assert!(rastrigin(&[1.0]) > rastrigin(&[0.0]));
        assert!(rastrigin(&[0.5]) > rastrigin(&[1.0]));
    }

    #[test]
    fn test_rosenbrock_short_input() {
        assert_eq!(rosenbrock(&[]), 0.0);
        assert_eq!(rosenbrock(&[3.0]), 0.0);
    }
}
