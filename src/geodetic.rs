//! ECEF ↔ geodetic conversions on the WGS-84 ellipsoid.

use nalgebra::Vector3;

use crate::constants::{WGS84_ECCENTRICITY_SQUARED, WGS84_SEMI_MAJOR_AXIS};

/// Converts geodetic coordinates to an ECEF position.
///
/// # Arguments
/// - `lat_deg`: geodetic latitude in degrees (+N, -S)
/// - `lon_deg`: longitude in degrees (+E, -W)
/// - `hae_m`: height above the WGS-84 ellipsoid in meters
///
/// # Returns
/// ECEF (WGS-84 cartesian) position in meters.
///
/// # Example
/// ```
/// use sicd_projection::geodetic::geodetic_to_ecef;
///
/// let p = geodetic_to_ecef(0.0, 0.0, 0.0);
/// assert!((p.x - 6_378_137.0).abs() < 1e-6);
/// assert!(p.y.abs() < 1e-6 && p.z.abs() < 1e-6);
/// ```
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, hae_m: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();

    // Prime vertical curvature radius
    let nu = WGS84_SEMI_MAJOR_AXIS / (1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt();

    let rho = (nu + hae_m) * cos_lat;
    Vector3::new(
        rho * cos_lon,
        rho * sin_lon,
        ((1.0 - WGS84_ECCENTRICITY_SQUARED) * nu + hae_m) * sin_lat,
    )
}

/// Converts an ECEF position to geodetic coordinates.
///
/// Uses the closed-form Vermeille algorithm, with a height accuracy on the
/// order of nanometers. The evolute sign is not checked, so positions deeper
/// than roughly 6300 km below the surface are outside the supported domain.
///
/// # Returns
/// `(lat_deg, lon_deg, hae_m)` on the WGS-84 ellipsoid.
pub fn ecef_to_geodetic(point: &Vector3<f64>) -> (f64, f64, f64) {
    let e2 = WGS84_ECCENTRICITY_SQUARED;
    let e4 = e2 * e2;
    let inv_a2 = 1.0 / (WGS84_SEMI_MAJOR_AXIS * WGS84_SEMI_MAJOR_AXIS);

    // Distance from the rotation axis in the equatorial plane
    let dist = point.x.hypot(point.y);

    let p = dist * dist * inv_a2;
    let q = (1.0 - e2) * point.z * point.z * inv_a2;
    let r = (p + q - e4) / 6.0;
    let r2 = r * r;

    let s = ((8.0 * r2 * r + e4 * p * q).sqrt() + e2 * (p * q).sqrt()).cbrt();
    let s2 = s * s; // cube root raised to 2/3
    let u = r + 0.5 * s2 + 2.0 * r2 / s2;
    let v = (u * u + e4 * q).sqrt();
    let uv = u + v;
    let w = 0.5 * e2 * (uv - q) / v;
    let k = uv / (w + (w * w + uv).sqrt());
    let d = k * dist / (k + e2);
    let hypot_dz = d.hypot(point.z);

    let lat = 2.0 * (point.z / (d + hypot_dz)).atan();
    let lon = point.y.atan2(point.x);
    let hae = (k + e2 - 1.0) * hypot_dz / k;
    (lat.to_degrees(), lon.to_degrees(), hae)
}

/// Unit vector in the direction of increasing ellipsoidal height at the given
/// geodetic latitude and longitude.
pub fn wgs84_up(lat_deg: f64, lon_deg: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_mid_latitude() {
        let (lat0, lon0, hae0) = (38.8895, -77.0353, 125.3);
        let p = geodetic_to_ecef(lat0, lon0, hae0);
        let (lat, lon, hae) = ecef_to_geodetic(&p);
        assert!((lat - lat0).abs() < 1e-11);
        assert!((lon - lon0).abs() < 1e-11);
        assert!((hae - hae0).abs() < 1e-7);
    }

    #[test]
    fn test_poles_and_equator() {
        let north = geodetic_to_ecef(90.0, 0.0, 0.0);
        assert!(north.x.abs() < 1e-6 && north.y.abs() < 1e-6);
        assert!((north.z - 6_356_752.314_245).abs() < 1e-5);

        let (lat, _lon, hae) = ecef_to_geodetic(&Vector3::new(0.0, 6_378_137.0, 0.0));
        assert!(lat.abs() < 1e-11);
        assert!(hae.abs() < 1e-7);
    }

    #[test]
    fn test_up_vector_is_unit_and_outward() {
        let up = wgs84_up(45.0, 120.0);
        assert!((up.norm() - 1.0).abs() < 1e-15);

        let p = geodetic_to_ecef(45.0, 120.0, 0.0);
        let lifted = p + 100.0 * up;
        let (_, _, hae) = ecef_to_geodetic(&lifted);
        assert!((hae - 100.0).abs() < 1e-6);
    }
}
