//! Bowl gouge model and grinding solver.
//!
//! A gouge is round bar stock with a channel (flute) milled along it and a
//! cutting edge ground on a wheel. Tool coordinates put the nose near the
//! origin: x across the channel, y up, z along the bar toward the handle.
//! All measurements are in inches because that is the way the industry
//! works.

mod grind;

pub use grind::{wheel_contact_curve, StartMode, Sweep};

use tracing::debug;

use crate::error::{FairlineError, GrindError, Result};
use crate::jig::Jig;
use crate::math::spline::{BoundaryMode, CubicSpline};
use crate::math::vector::unit_vector;
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// A gouge design: bar, channel, edge profile and grinding setup.
///
/// Immutable once built; [`Gouge::solve`] derives the full grinding geometry
/// as a separate value.
#[derive(Debug, Clone)]
pub struct Gouge {
    /// Bar stock diameter in inches.
    pub bar_diameter: f64,
    /// Grinding wheel diameter in inches.
    pub wheel_diameter: f64,
    /// Nose angle in radians.
    pub nose_angle: f64,
    /// Grinding jig holding the gouge.
    pub jig: Jig,
    /// Channel curve from the middle bottom to the +x bar edge, as (x, y).
    channel: Vec<Point2>,
    /// Cutting edge profile as (height, depth) pairs, ascending height.
    profile: Vec<Point2>,
    /// Angle from vertical to the top of the channel, radians.
    bar_channel_angle: f64,
}

impl Default for Gouge {
    fn default() -> Self {
        Self::new(0.5, 8.0, 50f64.to_radians(), Jig::default())
    }
}

impl Gouge {
    /// Creates a gouge with the given bar and grinding setup and no channel
    /// or profile curves yet.
    #[must_use]
    pub fn new(bar_diameter: f64, wheel_diameter: f64, nose_angle: f64, jig: Jig) -> Self {
        Self {
            bar_diameter,
            wheel_diameter,
            nose_angle,
            jig,
            channel: Vec::new(),
            profile: Vec::new(),
            bar_channel_angle: 0.0,
        }
    }

    /// Sets the channel curve and its bar/channel angle.
    #[must_use]
    pub fn with_channel(mut self, points: Vec<Point2>, bar_channel_angle: f64) -> Self {
        self.channel = points;
        self.bar_channel_angle = bar_channel_angle;
        self
    }

    /// Sets the channel to a parabola starting `0.1 * bar_diameter` below
    /// center and clipped to the bar circle, recording the bar/channel angle
    /// where it meets the bar edge.
    #[must_use]
    pub fn with_parabolic_channel(mut self) -> Self {
        let r = self.bar_radius();
        let mut points = Vec::new();
        let mut last = Point3::origin();
        let mut hit = Point3::origin();
        for i in 0..=10 {
            let f = f64::from(i) / 10.0;
            let x = f * r;
            let y = f * f * r - 0.1 * self.bar_diameter;
            if x * x + y * y >= r * r {
                hit = grind::bar_intercept(&last, &Point3::new(x, y, 0.0), r);
                break;
            }
            points.push(Point2::new(x, y));
            last = Point3::new(x, y, 0.0);
        }
        self.bar_channel_angle = hit.x.atan2(hit.y);
        points.push(Point2::new(
            r * self.bar_channel_angle.sin(),
            r * self.bar_channel_angle.cos(),
        ));
        self.channel = points;
        self
    }

    /// Sets a flat wing profile at `wing_angle` (radians) from the
    /// centerline, running from the channel bottom to the channel top edge.
    ///
    /// # Errors
    ///
    /// Fails if no channel has been set.
    pub fn with_flat_profile(mut self, wing_angle: f64) -> Result<Self> {
        let ybot = self
            .channel_bottom_y()
            .ok_or(GrindError::EmptyChannel)?;
        let ytop = self.bar_channel_angle.sin() * self.bar_radius();
        let dy = ytop - ybot;
        let dz = dy / wing_angle.tan();
        let mut points = Vec::with_capacity(100);
        for i in 0..100 {
            let m = f64::from(i) / 99.0;
            points.push(Point2::new(m * dy + ybot, -m * dz));
        }
        self.profile = points;
        Ok(self)
    }

    /// Sets the cutting edge profile as (height, depth) pairs.
    #[must_use]
    pub fn with_profile(mut self, points: Vec<Point2>) -> Self {
        self.profile = points;
        self
    }

    /// Channel curve points.
    #[must_use]
    pub fn channel(&self) -> &[Point2] {
        &self.channel
    }

    /// Edge profile points.
    #[must_use]
    pub fn profile(&self) -> &[Point2] {
        &self.profile
    }

    /// Angle from vertical to the top of the channel, radians.
    #[must_use]
    pub fn bar_channel_angle(&self) -> f64 {
        self.bar_channel_angle
    }

    /// Bar radius.
    #[must_use]
    pub fn bar_radius(&self) -> f64 {
        self.bar_diameter / 2.0
    }

    /// Bar height at the top of the channel.
    #[must_use]
    pub fn bar_top_height(&self) -> f64 {
        self.bar_channel_angle.cos() * self.bar_radius()
    }

    /// Width in the bar at the top of the channel.
    #[must_use]
    pub fn bar_top_width(&self) -> f64 {
        self.bar_channel_angle.sin() * self.bar_radius()
    }

    /// Channel bottom y value, which is also the nose y value.
    #[must_use]
    pub fn channel_bottom_y(&self) -> Option<f64> {
        self.channel.first().map(|p| p.y)
    }

    /// Curve of the outside of the bar end, the trailing edge of the ground
    /// area.
    #[must_use]
    pub fn bar_end_curve(&self) -> Vec<Point3> {
        let r = self.bar_radius();
        let start = self.bar_channel_angle;
        let end = std::f64::consts::TAU - self.bar_channel_angle;
        (0..100)
            .map(|i| {
                let a = start + (end - start) * f64::from(i) / 99.0;
                Point3::new(a.sin() * r, a.cos() * r, 0.0)
            })
            .collect()
    }

    /// Points defining the cutting edge curve.
    ///
    /// Looking along z (end view) the edge follows the channel; looking
    /// along x (profile view) it follows the grind profile. The channel is
    /// mirrored across the centerline and prepended in reverse, so the curve
    /// runs from the -x wing over the nose to the +x wing. With `half` set,
    /// stops after the center point.
    #[must_use]
    pub fn cutting_edge_points(&self, half: bool) -> Vec<Point3> {
        let mut points = Vec::new();
        for j in (1..self.channel.len()).rev() {
            let p = self.channel[j];
            points.push(Point3::new(-p.x, p.y, self.profile_depth_at(p.y)));
        }
        for j in 0..self.channel.len() {
            let p = self.channel[j];
            points.push(Point3::new(p.x, p.y, self.profile_depth_at(p.y)));
            if half {
                break;
            }
        }
        points
    }

    /// Linear interpolation of the profile depth at a channel height,
    /// clamped to the profile ends.
    fn profile_depth_at(&self, y: f64) -> f64 {
        let Some(first) = self.profile.first() else {
            return 0.0;
        };
        let Some(last) = self.profile.last() else {
            return 0.0;
        };
        if y <= first.x {
            return first.y;
        }
        if y >= last.x {
            return last.y;
        }
        for w in self.profile.windows(2) {
            if y <= w[1].x && w[1].x - w[0].x > TOLERANCE {
                let m = (y - w[0].x) / (w[1].x - w[0].x);
                return w[0].y + m * (w[1].y - w[0].y);
            }
        }
        last.y
    }

    /// Spline curve for the cutting edge, parameterized from -1.0 to +1.0
    /// with 0.0 at the nose.
    ///
    /// The parameter axis is the cumulative chord distance along the edge
    /// rescaled to `[-1, 1]`, so equal parameter steps correspond
    /// approximately to equal distance along the edge.
    ///
    /// # Errors
    ///
    /// Fails if the channel gives fewer than two distinct edge points.
    pub fn cutting_edge_curve(&self) -> Result<EdgeCurve> {
        let points = self.cutting_edge_points(false);
        let mut distance = Vec::with_capacity(points.len());
        let mut total = 0.0;
        distance.push(0.0);
        for w in points.windows(2) {
            total += (w[1] - w[0]).norm();
            distance.push(total);
        }
        let scale = 2.0 / total;
        let knots: Vec<f64> = distance.iter().map(|d| d * scale - 1.0).collect();
        let x = CubicSpline::new(
            knots.clone(),
            points.iter().map(|p| p.x).collect(),
            BoundaryMode::Natural,
        )?;
        let y = CubicSpline::new(
            knots.clone(),
            points.iter().map(|p| p.y).collect(),
            BoundaryMode::Natural,
        )?;
        let z = CubicSpline::new(
            knots,
            points.iter().map(|p| p.z).collect(),
            BoundaryMode::Natural,
        )?;
        Ok(EdgeCurve { x, y, z })
    }

    /// Solves the grinding geometry for sample points along the half edge
    /// from the wing top (`-1.0`) to the nose (`0.0`).
    ///
    /// For each sample the jig rotation is searched for the angle putting
    /// the edge tangent in the wheel-contact plane (tangent perpendicular to
    /// the contact normal). Samples where no rotation gets the residual
    /// below the tolerance are skipped and reported, not fatal.
    ///
    /// # Errors
    ///
    /// Fails only on degenerate input geometry; partial solutions are
    /// normal output.
    #[allow(clippy::cast_precision_loss)]
    pub fn solve(&self, params: &SolveParams) -> Result<SolvedGouge> {
        let edge = self.cutting_edge_curve()?;
        let wheel_radius = self.wheel_diameter / 2.0;
        let sweep = Sweep {
            wheel_radius,
            bar_radius: self.bar_radius(),
            max_angle: self.bar_diameter * params.sweep_factor / wheel_radius,
            steps: params.sweep_steps,
        };
        let half = params.edge_samples.div_ceil(2).max(2);
        let wheel_normal_jig = self.jig.grinding_wheel_normal();
        let wheel_tangent_jig = self.jig.grinding_wheel_tangent();

        let mut samples = Vec::new();
        let mut unsolved = Vec::new();
        let mut extension = None;
        for k in 0..half {
            let aj = -1.0 + k as f64 / (half - 1) as f64;
            let point = edge.point_at(aj);
            let tangent = edge.tangent_at(aj)?;

            let mut best_rotation = 0.0;
            let mut best_dot = f64::INFINITY;
            for i in 0..params.rotation_steps {
                let rotation =
                    params.rotation_limit * i as f64 / (params.rotation_steps - 1) as f64;
                let normal = self.jig.to_tool_coords(&wheel_normal_jig, rotation)?;
                let dot = normal.dot(&tangent).abs();
                if dot < best_dot {
                    best_dot = dot;
                    best_rotation = rotation;
                }
            }
            if best_dot > params.tangency_tolerance {
                debug!(
                    parameter = aj,
                    residual = best_dot,
                    "no jig rotation achieves tangency, skipping edge point"
                );
                unsolved.push(UnsolvedSample {
                    parameter: aj,
                    residual: best_dot,
                });
                continue;
            }

            let wheel_normal = self.jig.to_tool_coords(&wheel_normal_jig, best_rotation)?;
            let wheel_tangent = self.jig.to_tool_coords(&wheel_tangent_jig, best_rotation)?;
            let axis = wheel_normal.cross(&wheel_tangent);
            let grinding_line =
                wheel_contact_curve(&point, &wheel_normal, &axis, &sweep, StartMode::Inside)?;

            if k == 0 && polyline_length(&grinding_line) > TOLERANCE {
                extension =
                    Some(self.extension_surface(&point, &wheel_normal, &axis, &sweep, params)?);
            }

            samples.push(EdgeSample {
                parameter: aj,
                point,
                tangent,
                wheel_normal,
                wheel_tangent,
                rotation: best_rotation,
                residual: best_dot,
                grinding_line,
            });
        }
        Ok(SolvedGouge {
            samples,
            unsolved,
            extension,
        })
    }

    /// Boundary of the ground surface beyond the flute top.
    ///
    /// Steps the start point backward along the wheel axis, tracing a
    /// contact line at each step with the start allowed to sit outside the
    /// bar, until a sweep misses the bar entirely (the true edge of
    /// material). Leading points then trailing points in reverse give one
    /// closed boundary traversal.
    #[allow(clippy::cast_precision_loss)]
    fn extension_surface(
        &self,
        start: &Point3,
        normal: &Vector3,
        axis: &Vector3,
        sweep: &Sweep,
        params: &SolveParams,
    ) -> Result<ExtensionSurface> {
        let axis_dir = unit_vector(axis)?;
        let reach = 2.0 * self.bar_radius();
        let mut leading = Vec::new();
        let mut trailing = Vec::new();
        let mut grinding_lines = Vec::new();
        for s in 1..=params.extension_steps {
            let offset = reach * s as f64 / params.extension_steps as f64;
            let shifted = start - axis_dir * offset;
            match wheel_contact_curve(&shifted, normal, axis, sweep, StartMode::AllowOutside) {
                Ok(line) => {
                    if let (Some(first), Some(last)) = (line.first(), line.last()) {
                        leading.push(*first);
                        trailing.push(*last);
                    }
                    grinding_lines.push(line);
                }
                Err(FairlineError::Grind(GrindError::NoBarIntersection)) => break,
                Err(e) => return Err(e),
            }
        }
        let mut boundary = leading;
        boundary.extend(trailing.into_iter().rev());
        Ok(ExtensionSurface {
            boundary,
            grinding_lines,
        })
    }
}

/// 3D parametric cutting edge curve over `[-1, 1]`, 0 at the nose.
#[derive(Debug, Clone)]
pub struct EdgeCurve {
    x: CubicSpline,
    y: CubicSpline,
    z: CubicSpline,
}

impl EdgeCurve {
    /// Evaluates the edge curve at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        Point3::new(self.x.value_at(t), self.y.value_at(t), self.z.value_at(t))
    }

    /// Unit tangent of the edge curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the derivative vanishes.
    pub fn tangent_at(&self, t: f64) -> Result<Vector3> {
        unit_vector(&Vector3::new(
            self.x.derivative_at(t),
            self.y.derivative_at(t),
            self.z.derivative_at(t),
        ))
    }
}

/// Tuning parameters for [`Gouge::solve`].
///
/// The tangency tolerance and search resolution are empirical; they are
/// parameters rather than constants so a setup can tighten them.
#[derive(Debug, Clone, Copy)]
pub struct SolveParams {
    /// Number of samples along the whole edge; odd keeps one at the nose.
    pub edge_samples: usize,
    /// Most negative jig rotation searched, radians.
    pub rotation_limit: f64,
    /// Rotation search grid size (at least 2).
    pub rotation_steps: usize,
    /// Acceptance threshold on the tangent / contact-normal dot product.
    pub tangency_tolerance: f64,
    /// Angular increments of each wheel-contact sweep.
    pub sweep_steps: usize,
    /// Multiple of bar diameter bounding the sweep angle.
    pub sweep_factor: f64,
    /// Steps when extending the flute-top boundary backward.
    pub extension_steps: usize,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            edge_samples: 21,
            rotation_limit: -120f64.to_radians(),
            rotation_steps: 500,
            tangency_tolerance: 0.01,
            sweep_steps: 200,
            sweep_factor: 2.0,
            extension_steps: 500,
        }
    }
}

/// One solved edge sample, everything in tool coordinates.
#[derive(Debug, Clone)]
pub struct EdgeSample {
    /// Edge curve parameter in `[-1, 0]`.
    pub parameter: f64,
    /// Point on the cutting edge.
    pub point: Point3,
    /// Unit tangent of the edge.
    pub tangent: Vector3,
    /// Wheel-contact-plane normal.
    pub wheel_normal: Vector3,
    /// Wheel-contact-plane tangent.
    pub wheel_tangent: Vector3,
    /// Solved jig rotation, radians.
    pub rotation: f64,
    /// Achieved tangency residual.
    pub residual: f64,
    /// Wheel-contact curve from the edge point to the bar boundary.
    pub grinding_line: Vec<Point3>,
}

impl EdgeSample {
    /// Tail point of the grinding line, on the bar boundary.
    #[must_use]
    pub fn tail(&self) -> Option<&Point3> {
        self.grinding_line.last()
    }
}

/// Edge sample that failed the tangency test and was skipped.
#[derive(Debug, Clone, Copy)]
pub struct UnsolvedSample {
    /// Edge curve parameter in `[-1, 0]`.
    pub parameter: f64,
    /// Best residual found over the rotation grid.
    pub residual: f64,
}

/// Ground-surface boundary beyond the flute top.
#[derive(Debug, Clone)]
pub struct ExtensionSurface {
    /// Closed boundary traversal: entry intercepts out, exits back.
    pub boundary: Vec<Point3>,
    /// Contact line for each successful backward step.
    pub grinding_lines: Vec<Vec<Point3>>,
}

/// Complete grinding solution, in edge sample order (wing top to nose).
#[derive(Debug, Clone)]
pub struct SolvedGouge {
    /// Solved samples, ordered by edge parameter.
    pub samples: Vec<EdgeSample>,
    /// Samples skipped as tangency-unsolvable.
    pub unsolved: Vec<UnsolvedSample>,
    /// Extension surface at the flute top, when one exists.
    pub extension: Option<ExtensionSurface>,
}

impl SolvedGouge {
    /// The nose sample (parameter 0.0), if it solved.
    #[must_use]
    pub fn nose(&self) -> Option<&EdgeSample> {
        self.samples
            .iter()
            .find(|s| s.parameter.abs() < TOLERANCE)
    }
}

fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}
