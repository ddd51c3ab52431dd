//! Fair interpolating curves through measured point sets.
//!
//! These routines aim to work acceptably under all circumstances, never much
//! worse than a linear interpolation. Measurements are real-space inches for
//! boats around 15' long, so anything under 0.01" is not significant.

use crate::error::{FairingError, Result};
use crate::math::spline::{BoundaryMode, CubicSpline};
use crate::math::Point2;

/// Default real-space sampling step in inches.
pub const DEFAULT_STEP: f64 = 0.1;

/// A smooth interpolating curve through an ordered set of control points.
///
/// The curve is parameterized over `[0, N-1]` with integer parameter values
/// landing on the control points; evaluation outside the domain extrapolates.
/// Immutable after construction: a different point set means a new curve.
#[derive(Debug, Clone)]
pub struct FairCurve {
    points: Vec<Point2>,
    mid_index: Option<usize>,
    spline_x: CubicSpline,
    spline_y: CubicSpline,
}

impl FairCurve {
    /// Fits a natural-boundary fair curve through `points`.
    ///
    /// # Errors
    ///
    /// Fails on an empty point set. A single point is duplicated into a
    /// degenerate two-point curve rather than failing.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        Self::with_options(points, BoundaryMode::Natural, None)
    }

    /// Fits a natural-boundary fair curve with `mid_index` marking a
    /// meaningful split point (e.g. the keel of a mirrored cross-section).
    ///
    /// # Errors
    ///
    /// Fails on an empty point set.
    pub fn with_mid_index(points: Vec<Point2>, mid_index: usize) -> Result<Self> {
        Self::with_options(points, BoundaryMode::Natural, Some(mid_index))
    }

    /// Fits a fair curve with an explicit boundary mode and optional
    /// `mid_index` marking a meaningful split point (e.g. the keel of a
    /// mirrored cross-section).
    ///
    /// # Errors
    ///
    /// Fails on an empty point set.
    #[allow(clippy::cast_precision_loss)]
    pub fn with_options(
        mut points: Vec<Point2>,
        boundary: BoundaryMode,
        mid_index: Option<usize>,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(FairingError::EmptyPointSet.into());
        }
        if points.len() == 1 {
            let p = points[0];
            points.push(p);
        }
        let knots: Vec<f64> = (0..points.len()).map(|i| i as f64).collect();
        let spline_x = CubicSpline::new(knots.clone(), points.iter().map(|p| p.x).collect(), boundary)?;
        let spline_y = CubicSpline::new(knots, points.iter().map(|p| p.y).collect(), boundary)?;
        Ok(Self {
            points,
            mid_index,
            spline_x,
            spline_y,
        })
    }

    /// The control points the curve was fitted through.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of control points (at least two).
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Optional split-point index supplied at construction.
    #[must_use]
    pub fn mid_index(&self) -> Option<usize> {
        self.mid_index
    }

    /// Largest integer parameter value, `N-1`.
    #[must_use]
    pub fn max_parameter(&self) -> usize {
        self.points.len() - 1
    }

    /// Evaluates the curve at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        Point2::new(self.spline_x.value_at(t), self.spline_y.value_at(t))
    }

    /// Real-space distance between control points `i` and `i+1`.
    fn chord(&self, i: usize) -> f64 {
        (self.points[i] - self.points[i + 1]).norm()
    }

    fn range(&self, start: usize, end: usize, step: f64) -> ParameterRange<'_> {
        ParameterRange {
            curve: self,
            segment: start,
            end,
            sub: 0,
            subdivisions: 1,
            step,
            done: false,
        }
    }

    /// Lazy sequence of increasing parameter values over `[start, end]`.
    ///
    /// Each integer segment is subdivided so consecutive samples are roughly
    /// `step` apart in real space; sampling density follows physical chord
    /// length, not parameter spacing. `end` is always yielded exactly once as
    /// the last value.
    ///
    /// # Errors
    ///
    /// Fails if `start > end` or `end` is beyond the parameter domain.
    pub fn parameter_range(
        &self,
        start: usize,
        end: usize,
        step: f64,
    ) -> Result<ParameterRange<'_>> {
        if start > end || end > self.max_parameter() {
            return Err(FairingError::InvalidRange { start, end }.into());
        }
        Ok(self.range(start, end, step))
    }

    /// Samples the whole curve as a polyline with real-space step of
    /// approximately `step`.
    #[must_use]
    pub fn curve(&self, step: f64) -> Vec<Point2> {
        self.range(0, self.max_parameter(), step)
            .map(|t| self.point_at(t))
            .collect()
    }

    /// Samples a sub-range of the curve as a polyline.
    ///
    /// # Errors
    ///
    /// Fails if the range is invalid.
    pub fn curve_between(&self, start: usize, end: usize, step: f64) -> Result<Vec<Point2>> {
        Ok(self
            .parameter_range(start, end, step)?
            .map(|t| self.point_at(t))
            .collect())
    }

    /// Length of the whole curve.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length_between(0, self.max_parameter())
    }

    /// Length of the curve between two control-point indices. Argument order
    /// does not matter; the result is always non-negative.
    #[must_use]
    pub fn length_between(&self, start: usize, end: usize) -> f64 {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let end = end.min(self.max_parameter());
        let mut length = 0.0;
        let mut last: Option<Point2> = None;
        for t in self.range(start, end, DEFAULT_STEP) {
            let p = self.point_at(t);
            if let Some(lp) = last {
                length += (p - lp).norm();
            }
            last = Some(p);
        }
        length
    }

    /// Finds an x value on the curve at the given `y`.
    ///
    /// The curve may not be a function of y, so the value is not necessarily
    /// unique; the scan is biased toward the start of the range, returning
    /// the first bracketing interval found.
    ///
    /// # Errors
    ///
    /// Fails with a lookup error if `y` is never bracketed in the range.
    pub fn x_at(&self, y: f64) -> Result<f64> {
        self.x_at_between(y, 0, self.max_parameter())
    }

    /// Like [`Self::x_at`] over a parameter sub-range.
    ///
    /// # Errors
    ///
    /// Fails if the range is invalid or `y` is never bracketed.
    #[allow(clippy::float_cmp)]
    pub fn x_at_between(&self, y: f64, start: usize, end: usize) -> Result<f64> {
        let mut last: Option<Point2> = None;
        for t in self.parameter_range(start, end, DEFAULT_STEP)? {
            let p = self.point_at(t);
            if p.y == y {
                return Ok(p.x);
            }
            if let Some(lp) = last {
                if (lp.y >= y && y >= p.y) || (p.y >= y && y >= lp.y) {
                    return Ok(p.x + (lp.x - p.x) * (y - p.y) / (lp.y - p.y));
                }
            }
            last = Some(p);
        }
        Err(FairingError::LookupNotFound {
            axis: "x",
            target_axis: "y",
            target: y,
        }
        .into())
    }

    /// Finds a y value on the curve at the given `x`, biased toward the start
    /// of the range.
    ///
    /// # Errors
    ///
    /// Fails with a lookup error if `x` is never bracketed in the range.
    pub fn y_at(&self, x: f64) -> Result<f64> {
        self.y_at_between(x, 0, self.max_parameter())
    }

    /// Like [`Self::y_at`] over a parameter sub-range.
    ///
    /// # Errors
    ///
    /// Fails if the range is invalid or `x` is never bracketed.
    #[allow(clippy::float_cmp)]
    pub fn y_at_between(&self, x: f64, start: usize, end: usize) -> Result<f64> {
        let mut last: Option<Point2> = None;
        for t in self.parameter_range(start, end, DEFAULT_STEP)? {
            let p = self.point_at(t);
            if p.x == x {
                return Ok(p.y);
            }
            if let Some(lp) = last {
                if (lp.x >= x && x >= p.x) || (p.x >= x && x >= lp.x) {
                    return Ok(p.y + (lp.y - p.y) * (x - p.x) / (lp.x - p.x));
                }
            }
            last = Some(p);
        }
        Err(FairingError::LookupNotFound {
            axis: "y",
            target_axis: "x",
            target: x,
        }
        .into())
    }
}

/// Iterator over parameter values produced by [`FairCurve::parameter_range`].
#[derive(Debug)]
pub struct ParameterRange<'a> {
    curve: &'a FairCurve,
    segment: usize,
    end: usize,
    sub: usize,
    subdivisions: usize,
    step: f64,
    done: bool,
}

impl Iterator for ParameterRange<'_> {
    type Item = f64;

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }
        if self.segment >= self.end {
            self.done = true;
            return Some(self.end as f64);
        }
        if self.sub == 0 {
            let steps = (self.curve.chord(self.segment) / self.step).ceil();
            self.subdivisions = if steps < 2.0 { 1 } else { steps as usize };
        }
        let t = self.segment as f64 + self.sub as f64 / self.subdivisions as f64;
        self.sub += 1;
        if self.sub >= self.subdivisions {
            self.sub = 0;
            self.segment += 1;
        }
        Some(t)
    }
}
