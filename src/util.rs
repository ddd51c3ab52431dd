//! Small numeric helpers shared by the hull and gouge models.

/// Sorted copy of `values` with extra points inserted wherever consecutive
/// values are more than `1.5 * gap` apart. Inserted points step by `gap`
/// from the lower value.
#[must_use]
pub fn fill_range(values: &[f64], gap: f64) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let max_gap = 1.5 * gap;
    let mut filled = Vec::with_capacity(sorted.len());
    let mut last: Option<f64> = None;
    for x in sorted {
        if let Some(mut prev) = last {
            while x - prev > max_gap {
                prev += gap;
                filled.push(prev);
            }
        }
        filled.push(x);
        last = Some(x);
    }
    filled
}

/// Rounds up to the nearest integer, treating values within `tolerance`
/// below an integer as already there.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn round_up(x: f64, tolerance: f64) -> i64 {
    if x >= 0.0 {
        (x + 1.0 - tolerance) as i64
    } else {
        (x - tolerance) as i64
    }
}

/// Rounds down to the nearest integer, treating values within `tolerance`
/// above an integer as already there.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn round_down(x: f64, tolerance: f64) -> i64 {
    if x >= 0.0 {
        (x + tolerance) as i64
    } else {
        -((-x + 1.0 - tolerance) as i64)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn fill_range_closes_large_gaps() {
        let filled = fill_range(&[0.0, 4.0, 5.0], 1.0);
        assert_eq!(filled.len(), 6);
        assert_relative_eq!(filled[0], 0.0);
        assert_relative_eq!(filled[1], 1.0);
        assert_relative_eq!(filled[2], 2.0);
        assert_relative_eq!(filled[3], 3.0);
        assert_relative_eq!(filled[4], 4.0);
        assert_relative_eq!(filled[5], 5.0);
    }

    #[test]
    fn fill_range_sorts_and_keeps_small_gaps() {
        let filled = fill_range(&[2.0, 0.5, 1.2], 1.0);
        assert_eq!(filled, vec![0.5, 1.2, 2.0]);
    }

    #[test]
    fn round_up_within_tolerance() {
        assert_eq!(round_up(3.0005, 0.001), 3);
        assert_eq!(round_up(3.1, 0.001), 4);
        assert_eq!(round_up(-3.1, 0.001), -3);
        assert_eq!(round_up(-3.0005, 0.001), -3);
    }

    #[test]
    fn round_down_within_tolerance() {
        assert_eq!(round_down(2.9995, 0.001), 3);
        assert_eq!(round_down(3.9, 0.001), 3);
        assert_eq!(round_down(-2.9995, 0.001), -3);
        assert_eq!(round_down(-3.1, 0.001), -4);
    }
}
