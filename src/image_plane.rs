//! Conversions between image grid coordinates and image plane points.
//!
//! The image plane is anchored at the scene center point and spanned by the
//! unit row and column vectors from the collection metadata. Grid locations
//! are (xrow, ycol) offsets in meters from the SCP.

use nalgebra::{Matrix2, Vector2, Vector3};

use crate::error::{ProjectionError, Result};
use crate::params::MetadataParams;

/// Precomputed 2x2 transform taking image plane displacements to grid
/// coordinates. The grid axes need not be orthogonal, so the transform
/// inverts the oblique row/column basis.
pub(crate) struct GridTransform {
    m: Matrix2<f64>,
}

impl GridTransform {
    pub(crate) fn new(meta: &MetadataParams) -> Result<Self> {
        let cos_theta = meta.u_row.dot(&meta.u_col);
        let sin_theta_sq = 1.0 - cos_theta * cos_theta;
        if sin_theta_sq <= f64::EPSILON {
            return Err(ProjectionError::DegenerateGeometry {
                calculation: "image plane point to image grid",
                reason: format!("uRow and uCol are collinear (cos = {cos_theta})"),
            });
        }
        let m = Matrix2::new(1.0, -cos_theta, -cos_theta, 1.0) / sin_theta_sq;
        Ok(Self { m })
    }

    #[inline]
    pub(crate) fn apply(&self, meta: &MetadataParams, point: &Vector3<f64>) -> Vector2<f64> {
        let delta = point - meta.scp;
        self.m * Vector2::new(delta.dot(&meta.u_row), delta.dot(&meta.u_col))
    }
}

#[inline]
pub(crate) fn grid_to_plane_point(meta: &MetadataParams, loc: &Vector2<f64>) -> Vector3<f64> {
    meta.scp + loc.x * meta.u_row + loc.y * meta.u_col
}

/// Converts image grid locations to the corresponding image plane positions.
///
/// # Arguments
/// - `meta`: metadata parameters relevant to projection
/// - `locs`: image grid locations with xrow/ycol in meters
///
/// # Returns
/// One ECEF image plane point per grid location:
///
/// ```text
/// IP = SCP + xrow * uRow + ycol * uCol
/// ```
pub fn image_grid_to_image_plane_point(
    meta: &MetadataParams,
    locs: &[Vector2<f64>],
) -> Vec<Vector3<f64>> {
    locs.iter().map(|loc| grid_to_plane_point(meta, loc)).collect()
}

/// Converts image plane positions to the corresponding image grid locations.
///
/// Solves the 2x2 system spanned by the (possibly oblique) row and column
/// unit vectors:
///
/// ```text
/// cos_theta = uRow . uCol
/// M = sin_theta^-2 * [[1, -cos_theta], [-cos_theta, 1]]
/// (xrow, ycol) = M * [(P - SCP) . uRow, (P - SCP) . uCol]
/// ```
///
/// # Errors
/// [`ProjectionError::DegenerateGeometry`] if `uRow` and `uCol` are
/// collinear.
pub fn image_plane_point_to_image_grid(
    meta: &MetadataParams,
    points: &[Vector3<f64>],
) -> Result<Vec<Vector2<f64>>> {
    let transform = GridTransform::new(meta)?;
    Ok(points.iter().map(|p| transform.apply(meta, p)).collect())
}
