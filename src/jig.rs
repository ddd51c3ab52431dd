//! Swing-jig linkage model for gouge grinding.

use crate::error::Result;
use crate::math::vector::unit_vector;
use crate::math::{Matrix3, Vector3};

/// Geometry of a two-bar gouge grinding jig.
///
/// Jig/wheel coordinates put the pivot point at the origin: x is
/// perpendicular to the jig when centered (so x = 0 for pivot, elbow, wheel
/// contact and wheel center), y is up, and z runs from the pivot through the
/// tool toward the wheel. At zero rotation the tool axes coincide with the
/// jig axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jig {
    /// Pivot-point-to-gouge-tip distance in inches.
    pub length: f64,
    /// Offset angle of the bar/flute in radians.
    pub angle: f64,
    /// Nose angle ground on the gouge in radians; this is the grinding wheel
    /// tangent angle when the jig is upright and centered.
    pub nose_angle: f64,
}

impl Default for Jig {
    fn default() -> Self {
        Self::new(9.0, 40f64.to_radians(), 50f64.to_radians())
    }
}

impl Jig {
    /// Creates a jig with the given linkage length, offset angle and nose
    /// angle (angles in radians).
    #[must_use]
    pub fn new(length: f64, angle: f64, nose_angle: f64) -> Self {
        Self {
            length,
            angle,
            nose_angle,
        }
    }

    /// Dimensions of the Thompson commercial jig setup.
    #[must_use]
    pub fn thompson(nose_angle: f64) -> Self {
        Self::new(9.37, 33.7f64.to_radians(), nose_angle)
    }

    /// Unit normal to the grinding wheel surface at the contact point, in
    /// jig/wheel coordinates. Points up: zero x, +y, -z.
    #[must_use]
    pub fn grinding_wheel_normal(&self) -> Vector3 {
        Vector3::new(0.0, self.nose_angle.cos(), -self.nose_angle.sin())
    }

    /// Unit tangent to the grinding wheel curve at the contact point, in
    /// jig/wheel coordinates. Points up: zero x, +y, +z.
    #[must_use]
    pub fn grinding_wheel_tangent(&self) -> Vector3 {
        Vector3::new(0.0, self.nose_angle.sin(), self.nose_angle.cos())
    }

    /// Tool y and z unit vectors at the given jig rotation (radians).
    ///
    /// Closed-form relations for the two-bar linkage: one endpoint is fixed
    /// at the pivot while the elbow swings with the rotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the linkage is degenerate (zero length).
    pub fn tool_vectors(&self, rotation: f64) -> Result<(Vector3, Vector3)> {
        let wx = 0.0;
        let wy = self.length * self.angle.sin();
        let wz = self.length * self.angle.cos();
        let f = wy * self.angle.cos();
        let elbow = Vector3::new(
            -f * rotation.sin(),
            wy * (1.0 - self.angle.cos().powi(2) * (1.0 - rotation.cos())),
            f * self.angle.sin() * (1.0 - rotation.cos()),
        );
        let tool_y = elbow;
        let tool_z = Vector3::new(wx, wy, wz) - elbow;
        Ok((unit_vector(&tool_y)?, unit_vector(&tool_z)?))
    }

    /// Rotation matrix from tool-local coordinates to jig/wheel coordinates
    /// at the given jig rotation. Columns are the tool x, y, z unit vectors
    /// with `x = y cross z`.
    ///
    /// # Errors
    ///
    /// Returns an error if the linkage is degenerate.
    pub fn tool_rotation_matrix(&self, rotation: f64) -> Result<Matrix3> {
        let (y_hat, z_hat) = self.tool_vectors(rotation)?;
        let x_hat = y_hat.cross(&z_hat);
        Ok(Matrix3::from_columns(&[x_hat, y_hat, z_hat]))
    }

    /// Maps a vector in jig/wheel coordinates into tool coordinates for the
    /// jig at the given rotation. `rotation = 0.0` is symmetric straight
    /// up-down, where the mapping is the identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the linkage is degenerate.
    pub fn to_tool_coords(&self, vector: &Vector3, rotation: f64) -> Result<Vector3> {
        Ok(self.tool_rotation_matrix(rotation)? * vector)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn wheel_vectors_are_unit_and_perpendicular() {
        let jig = Jig::default();
        let n = jig.grinding_wheel_normal();
        let t = jig.grinding_wheel_tangent();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(t.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.dot(&t), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn centered_tool_axes_match_jig_axes() {
        let jig = Jig::default();
        let (y_hat, z_hat) = jig.tool_vectors(0.0).unwrap();
        assert_relative_eq!(y_hat, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(z_hat, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        let m = jig.tool_rotation_matrix(0.0).unwrap();
        assert_relative_eq!(m, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn rotation_matrix_is_orthonormal() {
        for setup in [Jig::default(), Jig::thompson(50f64.to_radians())] {
            for deg in [0.0, -30.0, -60.0, -90.0, 45.0] {
                let m = setup.tool_rotation_matrix(f64::to_radians(deg)).unwrap();
                assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-9);
                for c in 0..3 {
                    assert_relative_eq!(m.column(c).norm(), 1.0, epsilon = 1e-9);
                    for c2 in 0..c {
                        assert_relative_eq!(
                            m.column(c).dot(&m.column(c2)),
                            0.0,
                            epsilon = 1e-9
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn centered_mapping_is_identity() {
        let jig = Jig::default();
        let n = jig.grinding_wheel_normal();
        let mapped = jig.to_tool_coords(&n, 0.0).unwrap();
        assert_relative_eq!(mapped, n, epsilon = 1e-12);
    }

    #[test]
    fn swinging_moves_the_elbow_sideways() {
        let jig = Jig::default();
        let (y_hat, _) = jig.tool_vectors(-45f64.to_radians()).unwrap();
        // Swinging in -rotation pushes the elbow to +x.
        assert!(y_hat.x > 0.0);
        assert!(y_hat.y > 0.0);
    }
}
