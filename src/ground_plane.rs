//! Projection of R/Rdot contours onto ground planes.
//!
//! A ground plane is parameterized by a reference point and a unit normal.
//! The monostatic projection is closed form; the bistatic projection walks
//! the plane with a 2x2 range/range-rate sensitivity matrix until the
//! displacement drops under threshold. Per-element failures (a contour that
//! never meets the plane) are reported as NaN outputs, never as errors.

use nalgebra::{Matrix2, Vector2, Vector3};

use crate::error::{ProjectionError, Result};
use crate::params::{
    BiApcState, BiProjectionSet, BistaticParams, CoaPosVels, MetadataParams, MonoProjectionSet,
    ScenePointGpXyParams, ScenePointRRdotParams,
};

#[inline]
fn nan3() -> Vector3<f64> {
    Vector3::repeat(f64::NAN)
}

/// Range and range-rate parameters of one scene point relative to one pair of
/// APC states.
pub(crate) fn pt_r_rdot_parameters(
    look: f64,
    apcs: &BiApcState,
    pt: &Vector3<f64>,
) -> ScenePointRRdotParams {
    // Transmit APC relative to the scene point
    let r_xmt = (apcs.xmt - pt).norm();
    let u_xmt = (apcs.xmt - pt) / r_xmt;
    let rdot_xmt = apcs.vxmt.dot(&u_xmt);
    let u_xmt_dot = (apcs.vxmt - rdot_xmt * u_xmt) / r_xmt;

    // Receive APC relative to the scene point
    let r_rcv = (apcs.rcv - pt).norm();
    let u_rcv = (apcs.rcv - pt) / r_rcv;
    let rdot_rcv = apcs.vrcv.dot(&u_rcv);
    let u_rcv_dot = (apcs.vrcv - rdot_rcv * u_rcv) / r_rcv;

    // Bistatic pointing vector and its derivative with respect to time
    let bp = 0.5 * (u_xmt + u_rcv);
    let bp_dot = 0.5 * (u_xmt_dot + u_rcv_dot);

    let spn = look * bp.cross(&bp_dot);

    ScenePointRRdotParams {
        r_avg: 0.5 * (r_xmt + r_rcv),
        rdot_avg: 0.5 * (rdot_xmt + rdot_rcv),
        bp,
        bp_dot,
        u_spn: spn / spn.norm(),
    }
}

/// Computes range and range-rate parameters at the given scene points.
///
/// For a bistatic ensemble the transmit and receive APC states are used
/// directly. A monostatic ensemble is handled as the coincident-APC special
/// case, for which the averages reduce to the plain ARP range, range rate,
/// and slant plane normal.
///
/// The COA ensemble and the scene points broadcast against each other: either
/// may have length one, otherwise their lengths must match.
pub fn compute_pt_r_rdot_parameters(
    meta: &MetadataParams,
    coa: &CoaPosVels,
    points: &[Vector3<f64>],
) -> Vec<ScenePointRRdotParams> {
    let look = meta.look();
    let n = coa.len().max(points.len());
    (0..n)
        .map(|i| {
            let pt = points[if points.len() == 1 { 0 } else { i }];
            let apcs = match coa {
                CoaPosVels::Monostatic(states) => {
                    let state = &states[if states.len() == 1 { 0 } else { i }];
                    BiApcState {
                        xmt: state.arp,
                        vxmt: state.varp,
                        rcv: state.arp,
                        vrcv: state.varp,
                    }
                }
                CoaPosVels::Bistatic(states) => {
                    states[if states.len() == 1 { 0 } else { i }].apcs()
                }
            };
            pt_r_rdot_parameters(look, &apcs, &pt)
        })
        .collect()
}

/// Ground plane basis and sensitivity matrices at one scene point.
pub(crate) fn gp_xy_parameters(
    pt: &Vector3<f64>,
    ugpn: &Vector3<f64>,
    bp: &Vector3<f64>,
    bp_dot: &Vector3<f64>,
) -> Result<ScenePointGpXyParams> {
    // In-plane component of the pointing vector defines +X
    let gx = bp - ugpn * bp.dot(ugpn);
    let u_gx = gx / gx.norm();

    // Orient +Y so the basis is consistently handed for Earth-surface planes
    let sgn = if ugpn.dot(pt) > 0.0 { 1.0 } else { -1.0 };
    let gy = sgn * ugpn.cross(&u_gx);
    let u_gy = gy / gy.norm();

    let m_rrdot_gpxy = -Matrix2::new(
        bp.dot(&u_gx),
        0.0,
        bp_dot.dot(&u_gx),
        bp_dot.dot(&u_gy),
    );
    let m_gpxy_rrdot =
        m_rrdot_gpxy
            .try_inverse()
            .ok_or_else(|| ProjectionError::DegenerateGeometry {
                calculation: "ground plane sensitivity",
                reason: "singular displacement sensitivity matrix".to_string(),
            })?;

    Ok(ScenePointGpXyParams {
        u_gx,
        u_gy,
        m_rrdot_gpxy,
        m_gpxy_rrdot,
    })
}

/// Computes ground plane basis vectors and sensitivity matrices for the given
/// scene points.
///
/// Inputs broadcast against each other: each slice may have length one,
/// otherwise all lengths must match.
///
/// # Errors
/// [`ProjectionError::DegenerateGeometry`] if a sensitivity matrix is
/// singular.
pub fn compute_gp_xy_parameters(
    points: &[Vector3<f64>],
    ugpn: &[Vector3<f64>],
    bp: &[Vector3<f64>],
    bp_dot: &[Vector3<f64>],
) -> Result<Vec<ScenePointGpXyParams>> {
    let n = points
        .len()
        .max(ugpn.len())
        .max(bp.len())
        .max(bp_dot.len());
    let pick = |xs: &[Vector3<f64>], i: usize| xs[if xs.len() == 1 { 0 } else { i }];
    (0..n)
        .map(|i| {
            gp_xy_parameters(
                &pick(points, i),
                &pick(ugpn, i),
                &pick(bp, i),
                &pick(bp_dot, i),
            )
        })
        .collect()
}

/// Closed-form projection of one monostatic R/Rdot contour onto a plane.
/// Returns NaN when the contour does not intersect the plane.
pub(crate) fn project_to_plane_mono(
    look: f64,
    set: &MonoProjectionSet,
    gref: &Vector3<f64>,
    uz: &Vector3<f64>,
) -> Vector3<f64> {
    // ARP height above the plane and ARP ground plane nadir
    let arpz = (set.arp - gref).dot(uz);
    if arpz.abs() > set.r {
        return nan3(); // contour sphere never reaches the plane
    }
    let agpn = set.arp - arpz * uz;

    // Ground distance from the nadir to the constant-range circle
    let g = (set.r * set.r - arpz * arpz).sqrt();
    let cos_graz = g / set.r;
    let sin_graz = arpz / set.r;

    // Velocity components in the plane frame; +X oriented along the in-plane
    // velocity so vx > 0
    let vz = set.varp.dot(uz);
    let vx = (set.varp.norm_squared() - vz * vz).sqrt();
    if vx == 0.0 {
        return nan3();
    }
    let u_x = (set.varp - vz * uz) / vx;
    let u_y = uz.cross(&u_x);

    // Azimuth to the ground plane point along the constant range circle
    let cos_az = (-set.rdot + vz * sin_graz) / (vx * cos_graz);
    if !(-1.0..=1.0).contains(&cos_az) {
        return nan3(); // no point on the circle matches the range rate
    }
    let sin_az = look * (1.0 - cos_az * cos_az).sqrt();

    agpn + g * cos_az * u_x + g * sin_az * u_y
}

/// Projects monostatic R/Rdot contours onto an arbitrary ground plane.
///
/// # Arguments
/// - `meta`: metadata parameters relevant to projection
/// - `sets`: monostatic COA projection sets, one per output point
/// - `gref`: ground plane reference point, ECEF meters
/// - `ugpn`: unit normal to the ground plane
///
/// # Returns
/// One ground plane point per projection set. Elements whose contour does not
/// intersect the plane are NaN; the call itself never fails.
pub fn r_rdot_to_ground_plane_mono(
    meta: &MetadataParams,
    sets: &[MonoProjectionSet],
    gref: &Vector3<f64>,
    ugpn: &Vector3<f64>,
) -> Vec<Vector3<f64>> {
    let look = meta.look();
    sets.iter()
        .map(|set| project_to_plane_mono(look, set, gref, ugpn))
        .collect()
}

/// Iterative projection of one bistatic R/Rdot contour onto a plane.
///
/// Returns the ground plane point, the magnitude of the final displacement
/// step, and whether the step fell under the threshold within `maxiter`
/// iterations.
pub(crate) fn project_to_plane_bi(
    meta: &MetadataParams,
    set: &BiProjectionSet,
    gref: &Vector3<f64>,
    ugpn: &Vector3<f64>,
    params: &BistaticParams,
) -> Result<(Vector3<f64>, f64, bool)> {
    let look = meta.look();
    let apcs = set.apcs();

    // Initial guess: the SCP projected along its local up onto the plane
    let u_up = meta.scp_up();
    let dist = (gref - meta.scp).dot(ugpn) / u_up.dot(ugpn);
    let mut g = meta.scp + dist * u_up;

    let mut delta_gp = f64::NAN;
    let mut converged = false;
    for _ in 0..params.maxiter {
        let pt = pt_r_rdot_parameters(look, &apcs, &g);
        let gp = gp_xy_parameters(&g, ugpn, &pt.bp, &pt.bp_dot)?;

        let delta = gp.m_gpxy_rrdot
            * Vector2::new(set.r_avg - pt.r_avg, set.rdot_avg - pt.rdot_avg);
        delta_gp = delta.norm();
        g += delta.x * gp.u_gx + delta.y * gp.u_gy;

        // Freeze once under threshold; a NaN displacement also freezes, as
        // unconverged
        if !(delta_gp > params.delta_gp_gpp) {
            converged = delta_gp <= params.delta_gp_gpp;
            break;
        }
    }
    Ok((g, delta_gp, converged))
}

/// Projects bistatic R/Rdot contours onto an arbitrary ground plane.
///
/// Each element iterates independently: the estimate moves in the plane by
/// the displacement the sensitivity matrix maps from the range and range-rate
/// residuals, and freezes once the step magnitude drops to `delta_gp_gpp`.
///
/// # Returns
/// `(g, delta_gp, success)`: the ground plane points, the final displacement
/// magnitudes, and whether every element converged within `maxiter`.
///
/// # Errors
/// [`ProjectionError::DegenerateGeometry`] if a sensitivity matrix is
/// singular.
pub fn r_rdot_to_ground_plane_bi(
    meta: &MetadataParams,
    sets: &[BiProjectionSet],
    gref: &Vector3<f64>,
    ugpn: &Vector3<f64>,
    params: &BistaticParams,
) -> Result<(Vec<Vector3<f64>>, Vec<f64>, bool)> {
    let mut g = Vec::with_capacity(sets.len());
    let mut delta_gp = Vec::with_capacity(sets.len());
    let mut success = true;
    for set in sets {
        let (gi, di, converged) = project_to_plane_bi(meta, set, gref, ugpn, params)?;
        g.push(gi);
        delta_gp.push(di);
        success &= converged;
    }
    Ok((g, delta_gp, success))
}
