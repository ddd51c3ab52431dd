use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Returns the unit vector in the direction of `v`.
///
/// # Errors
///
/// Returns an error if `v` has zero length.
pub fn unit_vector(v: &Vector3) -> Result<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}

/// Rotates `point` about the axis through `center` with direction `axis` by
/// a signed `angle` in radians (Rodrigues rotation, right-hand rule).
///
/// The axis need not be unit length.
///
/// # Errors
///
/// Returns an error if the axis has zero length.
pub fn rotate_point(point: &Point3, center: &Point3, axis: &Vector3, angle: f64) -> Result<Point3> {
    let k = unit_vector(axis)?;
    let v = point - center;
    let c = angle.cos();
    let s = angle.sin();
    let rotated = v * c + k.cross(&v) * s + k * (k.dot(&v) * (1.0 - c));
    Ok(center + rotated)
}
