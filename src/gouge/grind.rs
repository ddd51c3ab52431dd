//! Wheel-contact curve generation against the bar cylinder.
//!
//! A grinding line is traced by rotating an edge point about the wheel axis
//! (through the wheel center) until it leaves the cylindrical bar stock. The
//! bar axis coincides with the z coordinate axis.

use crate::error::{GrindError, Result};
use crate::math::vector::rotate_point;
use crate::math::{Point3, Vector3};

/// How the sweep treats its start point relative to the bar cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Start point is on the edge, inside the bar; the curve runs from it to
    /// the exit intercept.
    Inside,
    /// Start point may already be outside the bar (boundary-extension mode);
    /// the curve begins at the entry intercept. If the sweep never enters the
    /// bar this is reported as [`GrindError::NoBarIntersection`].
    AllowOutside,
}

/// Sweep tuning shared by every grinding line of one solve.
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    /// Grinding wheel radius in inches.
    pub wheel_radius: f64,
    /// Bar stock radius in inches.
    pub bar_radius: f64,
    /// Total angular change of the sweep, radians (applied negatively).
    pub max_angle: f64,
    /// Number of fixed angular increments.
    pub steps: usize,
}

/// Traces the wheel-contact curve from `start`.
///
/// The wheel center sits back from `start` along `normal` by the wheel
/// radius. The start point is rotated about `axis` through that center in
/// fixed negative increments; points inside the bar are collected, and the
/// bar-boundary intercept terminates the curve.
///
/// # Errors
///
/// In [`StartMode::AllowOutside`], returns [`GrindError::NoBarIntersection`]
/// if the sweep completes without ever entering the bar. Other errors are
/// degenerate-geometry conditions (zero rotation axis).
#[allow(clippy::cast_precision_loss)]
pub fn wheel_contact_curve(
    start: &Point3,
    normal: &Vector3,
    axis: &Vector3,
    sweep: &Sweep,
    mode: StartMode,
) -> Result<Vec<Point3>> {
    let center = start - normal * sweep.wheel_radius;
    let r2 = sweep.bar_radius * sweep.bar_radius;
    let inside = |p: &Point3| p.x * p.x + p.y * p.y < r2;

    let mut entered = mode == StartMode::Inside || inside(start);
    let mut points = if entered { vec![*start] } else { Vec::new() };
    let mut last = *start;
    for i in 1..=sweep.steps {
        let angle = -sweep.max_angle * i as f64 / sweep.steps as f64;
        let p = rotate_point(start, &center, axis, angle)?;
        if entered {
            if inside(&p) {
                points.push(p);
            } else {
                points.push(bar_intercept(&last, &p, sweep.bar_radius));
                return Ok(points);
            }
        } else if inside(&p) {
            points.push(bar_intercept(&last, &p, sweep.bar_radius));
            points.push(p);
            entered = true;
        }
        last = p;
    }
    if !entered {
        return Err(GrindError::NoBarIntersection.into());
    }
    Ok(points)
}

/// Intercept of the segment `p1` to `p2` with the bar cylinder surface.
///
/// Marches in 100 fixed substeps until the side of the boundary flips, then
/// projects the in-plane coordinates exactly onto the bar circle while
/// keeping the linearly interpolated z. A linear march at this resolution is
/// well inside measurement precision over the short spans involved.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn bar_intercept(p1: &Point3, p2: &Point3, radius: f64) -> Point3 {
    let r2 = radius * radius;
    let from_inside = p1.x * p1.x + p1.y * p1.y < r2;
    let mut found = *p2;
    for i in 0..=100 {
        let m = f64::from(i) / 100.0;
        let q = p1 + (p2 - p1) * m;
        if (q.x * q.x + q.y * q.y < r2) != from_inside {
            found = q;
            break;
        }
    }
    let angle = found.x.atan2(found.y);
    Point3::new(radius * angle.sin(), radius * angle.cos(), found.z)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sweep() -> Sweep {
        Sweep {
            wheel_radius: 4.0,
            bar_radius: 0.25,
            max_angle: 0.25,
            steps: 200,
        }
    }

    #[test]
    fn intercept_lands_on_bar_circle() {
        let inside = Point3::new(0.0, 0.1, 1.0);
        let outside = Point3::new(0.0, 0.4, 1.3);
        let hit = bar_intercept(&inside, &outside, 0.25);
        assert_relative_eq!(hit.x * hit.x + hit.y * hit.y, 0.0625, epsilon = 1e-12);
        assert!(hit.z > 1.0 && hit.z < 1.3);
        // Entering from outside finds the same boundary.
        let entry = bar_intercept(&outside, &inside, 0.25);
        assert_relative_eq!(entry.x * entry.x + entry.y * entry.y, 0.0625, epsilon = 1e-12);
    }

    #[test]
    fn inside_start_runs_to_the_bar_edge() {
        // Nose-like start point low in the bar, wheel normal tilted like a
        // 50 degree nose angle, wheel axis along x.
        let start = Point3::new(0.0, -0.05, 0.0);
        let normal = Vector3::new(0.0, 50f64.to_radians().cos(), -50f64.to_radians().sin());
        let axis = Vector3::new(1.0, 0.0, 0.0);
        let line = wheel_contact_curve(&start, &normal, &axis, &sweep(), StartMode::Inside).unwrap();
        assert!(line.len() > 2);
        assert_relative_eq!(line[0], start);
        let end = line.last().unwrap();
        assert_relative_eq!(end.x * end.x + end.y * end.y, 0.0625, epsilon = 1e-12);
        // Interior points stay inside the bar.
        for p in &line[..line.len() - 1] {
            assert!(p.x * p.x + p.y * p.y < 0.0625 + 1e-9);
        }
    }

    #[test]
    fn outside_start_enters_through_the_boundary() {
        // Same geometry shifted along the wheel axis so the start sits just
        // outside the bar; the sweep dips back in.
        let normal = Vector3::new(0.0, 50f64.to_radians().cos(), -50f64.to_radians().sin());
        let axis = Vector3::new(1.0, 0.0, 0.0);
        let start = Point3::new(0.26, -0.05, 0.0);
        let line =
            wheel_contact_curve(&start, &normal, &axis, &sweep(), StartMode::AllowOutside);
        // Rotating about x leaves x fixed, so this start never enters.
        assert!(matches!(
            line,
            Err(crate::FairlineError::Grind(GrindError::NoBarIntersection))
        ));

        // A start only just outside in y does enter as the point swings down.
        let start = Point3::new(0.0, 0.2501, 0.20);
        let line =
            wheel_contact_curve(&start, &normal, &axis, &sweep(), StartMode::AllowOutside).unwrap();
        assert!(!line.is_empty());
        let first = line.first().unwrap();
        assert_relative_eq!(
            first.x * first.x + first.y * first.y,
            0.0625,
            epsilon = 1e-12
        );
    }
}
