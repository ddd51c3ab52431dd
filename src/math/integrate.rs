/// Composite trapezoid rule for samples `y` at positions `x`.
///
/// Positions need not be evenly spaced. Returns 0.0 for fewer than two
/// samples.
#[must_use]
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn integrates_a_triangle() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 0.0];
        assert_relative_eq!(trapezoid(&y, &x), 1.0);
    }

    #[test]
    fn handles_uneven_spacing() {
        let x = [0.0, 0.5, 2.0];
        let y = [1.0, 1.0, 1.0];
        assert_relative_eq!(trapezoid(&y, &x), 2.0);
    }

    #[test]
    fn short_input_is_zero() {
        assert_relative_eq!(trapezoid(&[1.0], &[0.0]), 0.0);
        assert_relative_eq!(trapezoid(&[], &[]), 0.0);
    }
}
