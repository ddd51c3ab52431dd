//! Piecewise cubic spline interpolation over strictly increasing knots.
//!
//! One spline interpolates a single coordinate; parametric curves fit one
//! spline per coordinate against a shared knot vector.

use crate::error::{FairingError, Result};

/// Boundary condition applied when fitting a spline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoundaryMode {
    /// Second derivative zero at both ends.
    #[default]
    Natural,
    /// First derivative fixed at both ends.
    Clamped { start: f64, end: f64 },
}

/// A C2 interpolating cubic spline in one dimension.
///
/// Evaluation outside the knot span extrapolates with the end polynomials.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    /// Second derivative of the spline at each knot.
    second: Vec<f64>,
}

impl CubicSpline {
    /// Fits a cubic spline through `(knots[i], values[i])`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two knots are given, if the knot and
    /// value counts differ, or if the knots are not strictly increasing.
    pub fn new(knots: Vec<f64>, values: Vec<f64>, boundary: BoundaryMode) -> Result<Self> {
        let n = knots.len();
        if n < 2 {
            return Err(FairingError::TooFewKnots(n).into());
        }
        if values.len() != n {
            return Err(FairingError::KnotValueMismatch {
                knots: n,
                values: values.len(),
            }
            .into());
        }
        for i in 1..n {
            if knots[i] <= knots[i - 1] {
                return Err(FairingError::NonIncreasingKnots(i).into());
            }
        }

        let h: Vec<f64> = (0..n - 1).map(|i| knots[i + 1] - knots[i]).collect();
        let slope = |i: usize| (values[i + 1] - values[i]) / h[i];

        // Tridiagonal system for the second derivatives at the knots.
        let mut sub = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut sup = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        for i in 1..n - 1 {
            sub[i] = h[i - 1];
            diag[i] = 2.0 * (h[i - 1] + h[i]);
            sup[i] = h[i];
            rhs[i] = 6.0 * (slope(i) - slope(i - 1));
        }
        match boundary {
            BoundaryMode::Natural => {
                diag[0] = 1.0;
                diag[n - 1] = 1.0;
            }
            BoundaryMode::Clamped { start, end } => {
                diag[0] = 2.0 * h[0];
                sup[0] = h[0];
                rhs[0] = 6.0 * (slope(0) - start);
                sub[n - 1] = h[n - 2];
                diag[n - 1] = 2.0 * h[n - 2];
                rhs[n - 1] = 6.0 * (end - slope(n - 2));
            }
        }
        let second = solve_tridiagonal(&sub, &diag, &sup, &rhs);

        Ok(Self {
            knots,
            values,
            second,
        })
    }

    /// Start of the knot span.
    #[must_use]
    pub fn t_min(&self) -> f64 {
        self.knots[0]
    }

    /// End of the knot span.
    #[must_use]
    pub fn t_max(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    /// Index of the segment containing `t`, clamped so that parameters
    /// outside the span use the first or last polynomial.
    fn segment(&self, t: f64) -> usize {
        let last = self.knots.len() - 2;
        match self.knots.binary_search_by(|k| k.total_cmp(&t)) {
            Ok(i) => i.min(last),
            Err(i) => i.saturating_sub(1).min(last),
        }
    }

    /// Evaluates the spline at parameter `t`.
    #[must_use]
    pub fn value_at(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let h = self.knots[i + 1] - self.knots[i];
        let a = (self.knots[i + 1] - t) / h;
        let b = (t - self.knots[i]) / h;
        a * self.values[i]
            + b * self.values[i + 1]
            + ((a.powi(3) - a) * self.second[i] + (b.powi(3) - b) * self.second[i + 1]) * h * h
                / 6.0
    }

    /// Evaluates the first derivative of the spline at parameter `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let h = self.knots[i + 1] - self.knots[i];
        let a = (self.knots[i + 1] - t) / h;
        let b = (t - self.knots[i]) / h;
        (self.values[i + 1] - self.values[i]) / h
            + h / 6.0
                * ((3.0 * b * b - 1.0) * self.second[i + 1] - (3.0 * a * a - 1.0) * self.second[i])
    }
}

/// Thomas algorithm. Diagonals are full-length vectors; `sub[0]` and
/// `sup[n-1]` are unused.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let m = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / m;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / m;
    }
    let mut x = d;
    for i in (0..n - 1).rev() {
        x[i] -= c[i] * x[i + 1];
    }
    x
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn reproduces_knot_values() {
        let knots = vec![0.0, 1.0, 2.5, 4.0];
        let values = vec![1.0, -2.0, 0.5, 3.0];
        let s = CubicSpline::new(knots.clone(), values.clone(), BoundaryMode::Natural).unwrap();
        for (t, v) in knots.iter().zip(&values) {
            assert_relative_eq!(s.value_at(*t), *v, epsilon = 1e-12);
        }
    }

    #[test]
    fn two_points_is_a_straight_line() {
        let s = CubicSpline::new(vec![0.0, 2.0], vec![1.0, 5.0], BoundaryMode::Natural).unwrap();
        assert_relative_eq!(s.value_at(1.0), 3.0, epsilon = 1e-12);
        assert_relative_eq!(s.derivative_at(0.5), 2.0, epsilon = 1e-12);
        // Extrapolation continues the line
        assert_relative_eq!(s.value_at(3.0), 7.0, epsilon = 1e-12);
        assert_relative_eq!(s.value_at(-1.0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn natural_ends_have_zero_curvature() {
        let s = CubicSpline::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 1.0, 0.0, 1.0],
            BoundaryMode::Natural,
        )
        .unwrap();
        assert_relative_eq!(s.second[0], 0.0);
        assert_relative_eq!(s.second[3], 0.0);
    }

    #[test]
    fn clamped_honors_end_slopes() {
        let s = CubicSpline::new(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 0.0],
            BoundaryMode::Clamped {
                start: 0.0,
                end: 0.0,
            },
        )
        .unwrap();
        assert_relative_eq!(s.derivative_at(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.derivative_at(2.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.value_at(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn symmetric_data_evaluates_symmetrically() {
        let s = CubicSpline::new(
            vec![-1.0, 0.0, 1.0],
            vec![1.0, 0.0, 1.0],
            BoundaryMode::Natural,
        )
        .unwrap();
        assert_relative_eq!(s.value_at(-0.5), s.value_at(0.5), epsilon = 1e-12);
        assert_relative_eq!(s.derivative_at(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(CubicSpline::new(vec![0.0], vec![1.0], BoundaryMode::Natural).is_err());
        assert!(CubicSpline::new(vec![0.0, 0.0], vec![1.0, 2.0], BoundaryMode::Natural).is_err());
        assert!(CubicSpline::new(vec![1.0, 0.0], vec![1.0, 2.0], BoundaryMode::Natural).is_err());
        assert!(CubicSpline::new(vec![0.0, 1.0], vec![1.0], BoundaryMode::Natural).is_err());
    }
}
