//! Center of aperture time, sensor state, and R/Rdot contour generation.

use nalgebra::{Vector2, Vector3};

use crate::constants::SPEED_OF_LIGHT;
use crate::error::{ProjectionError, Result};
use crate::ground_plane::pt_r_rdot_parameters;
use crate::params::{
    BiPosVel, BiProjectionSet, CoaPosVels, CollectGeometry, GridType, ImageFormationAlgorithm,
    MetadataParams, MonoPosVel, MonoProjectionSet, PfaParams, ProjectionSets,
};

/// Computes center of aperture times for the given image grid locations.
///
/// # Returns
/// One COA time in seconds relative to collect start per grid location,
/// evaluated from the metadata time polynomial.
pub fn compute_coa_time(meta: &MetadataParams, locs: &[Vector2<f64>]) -> Vec<f64> {
    locs.iter().map(|loc| meta.ct_coa.eval(loc.x, loc.y)).collect()
}

/// Computes COA sensor positions and velocities at the given COA times.
///
/// For a monostatic image the ARP ephemeris polynomial and its derivative are
/// evaluated directly. For a bistatic image the transmit and receive APC
/// states are evaluated at retarded times offset by the one-way delay to the
/// geometric reference point:
///
/// ```text
/// tx = t_coa - |Xmt(t_coa) - GRP(t_coa)| / c
/// tr = t_coa + |Rcv(t_coa) - GRP(t_coa)| / c
/// ```
///
/// The delay correction is applied once, without iterating to convergence.
pub fn compute_coa_pos_vel(meta: &MetadataParams, t_coa: &[f64]) -> CoaPosVels {
    match &meta.geometry {
        CollectGeometry::Monostatic { arp_poly, .. } => {
            let varp_poly = arp_poly.derivative();
            CoaPosVels::Monostatic(
                t_coa
                    .iter()
                    .map(|&t| MonoPosVel {
                        arp: arp_poly.eval(t),
                        varp: varp_poly.eval(t),
                    })
                    .collect(),
            )
        }
        CollectGeometry::Bistatic {
            xmt_poly,
            rcv_poly,
            grp_poly,
            ..
        } => {
            let vxmt_poly = xmt_poly.derivative();
            let vrcv_poly = rcv_poly.derivative();
            CoaPosVels::Bistatic(
                t_coa
                    .iter()
                    .map(|&t| {
                        let grp = grp_poly.eval(t);

                        // Transmit time and APC state
                        let x0 = xmt_poly.eval(t);
                        let tx = t - (x0 - grp).norm() / SPEED_OF_LIGHT;

                        // Receive time and APC state
                        let r0 = rcv_poly.eval(t);
                        let tr = t + (r0 - grp).norm() / SPEED_OF_LIGHT;

                        BiPosVel {
                            grp,
                            tx,
                            tr,
                            xmt: xmt_poly.eval(tx),
                            vxmt: vxmt_poly.eval(tx),
                            rcv: rcv_poly.eval(tr),
                            vrcv: vrcv_poly.eval(tr),
                        }
                    })
                    .collect(),
            )
        }
    }
}

/// SCP R/Rdot contour parameters for a bistatic collection, shared between
/// the SCP range computation and the SCP slant plane normal.
struct ScpBistaticContour {
    r_avg: f64,
    rdot_avg: f64,
    bp: Vector3<f64>,
    bp_dot: Vector3<f64>,
}

fn scp_bistatic_contour(
    scp: &Vector3<f64>,
    xmt: &Vector3<f64>,
    vxmt: &Vector3<f64>,
    rcv: &Vector3<f64>,
    vrcv: &Vector3<f64>,
) -> ScpBistaticContour {
    let r_xmt = (xmt - scp).norm();
    let u_xmt = (xmt - scp) / r_xmt;
    let rdot_xmt = vxmt.dot(&u_xmt);
    let u_xmt_dot = (vxmt - rdot_xmt * u_xmt) / r_xmt;

    let r_rcv = (rcv - scp).norm();
    let u_rcv = (rcv - scp) / r_rcv;
    let rdot_rcv = vrcv.dot(&u_rcv);
    let u_rcv_dot = (vrcv - rdot_rcv * u_rcv) / r_rcv;

    ScpBistaticContour {
        r_avg: 0.5 * (r_xmt + r_rcv),
        rdot_avg: 0.5 * (rdot_xmt + rdot_rcv),
        bp: 0.5 * (u_xmt + u_rcv),
        bp_dot: 0.5 * (u_xmt_dot + u_rcv_dot),
    }
}

/// Computes the COA range and range rate for the scene center point.
///
/// For a monostatic image the values are relative to the ARP; for a bistatic
/// image they are averages over the transmit and receive APCs.
pub fn compute_scp_coa_r_rdot(meta: &MetadataParams) -> (f64, f64) {
    match &meta.geometry {
        CollectGeometry::Monostatic {
            arp_scp_coa,
            varp_scp_coa,
            ..
        } => {
            let r = (arp_scp_coa - meta.scp).norm();
            let u_pt = (arp_scp_coa - meta.scp) / r;
            (r, varp_scp_coa.dot(&u_pt))
        }
        CollectGeometry::Bistatic {
            xmt_scp_coa,
            vxmt_scp_coa,
            rcv_scp_coa,
            vrcv_scp_coa,
            ..
        } => {
            let contour =
                scp_bistatic_contour(&meta.scp, xmt_scp_coa, vxmt_scp_coa, rcv_scp_coa, vrcv_scp_coa);
            (contour.r_avg, contour.rdot_avg)
        }
    }
}

/// Computes the slant plane unit normal for the scene center point at its
/// center of aperture.
///
/// The normal carries the look-direction sign, so flipping the side of track
/// negates it.
pub fn compute_scp_coa_slant_plane_normal(meta: &MetadataParams) -> Vector3<f64> {
    let look = meta.look();
    let spn = match &meta.geometry {
        CollectGeometry::Monostatic {
            arp_scp_coa,
            varp_scp_coa,
            ..
        } => look * (arp_scp_coa - meta.scp).cross(varp_scp_coa),
        CollectGeometry::Bistatic {
            xmt_scp_coa,
            vxmt_scp_coa,
            rcv_scp_coa,
            vrcv_scp_coa,
            ..
        } => {
            let contour =
                scp_bistatic_contour(&meta.scp, xmt_scp_coa, vxmt_scp_coa, rcv_scp_coa, vrcv_scp_coa);
            look * contour.bp.cross(&contour.bp_dot)
        }
    };
    spn / spn.norm()
}

/// Computes COA range and range-rate contours for the given grid locations.
///
/// Dispatches on the metadata grid type and image formation algorithm; the
/// only supported combination is the RGAZIM grid formed with PFA.
///
/// # Errors
/// [`ProjectionError::UnsupportedGrid`] for any other combination, or when
/// the polar format polynomials are missing from the metadata.
pub fn compute_coa_r_rdot(
    meta: &MetadataParams,
    locs: &[Vector2<f64>],
    t_coa: &[f64],
    coa: &CoaPosVels,
) -> Result<(Vec<f64>, Vec<f64>)> {
    match (meta.grid_type, meta.ifa) {
        (GridType::RgAzim, ImageFormationAlgorithm::Pfa) => {
            let pfa = meta.pfa.as_ref().ok_or(ProjectionError::UnsupportedGrid {
                grid_type: meta.grid_type,
                ifa: meta.ifa,
            })?;
            Ok(r_rdot_from_rgazim_pfa(meta, pfa, locs, t_coa, coa))
        }
        (grid_type, ifa) => Err(ProjectionError::UnsupportedGrid { grid_type, ifa }),
    }
}

/// Image grid to R/Rdot for the RGAZIM grid formed with PFA.
fn r_rdot_from_rgazim_pfa(
    meta: &MetadataParams,
    pfa: &PfaParams,
    locs: &[Vector2<f64>],
    t_coa: &[f64],
    coa: &CoaPosVels,
) -> (Vec<f64>, Vec<f64>) {
    // Range and range rate of the SCP contour per location
    let scp_contours: Vec<(f64, f64)> = match coa {
        CoaPosVels::Monostatic(states) => states
            .iter()
            .map(|state| {
                let r_vec = state.arp - meta.scp;
                let r_scp = r_vec.norm();
                (r_scp, state.varp.dot(&r_vec) / r_scp)
            })
            .collect(),
        CoaPosVels::Bistatic(states) => states
            .iter()
            .map(|state| {
                let pt = pt_r_rdot_parameters(meta.look(), &state.apcs(), &meta.scp);
                (pt.r_avg, pt.rdot_avg)
            })
            .collect(),
    };

    let dtheta_poly = pfa.polar_ang_poly.derivative();
    let dksf_poly = pfa.spatial_freq_sf_poly.derivative();

    let mut r = Vec::with_capacity(locs.len());
    let mut rdot = Vec::with_capacity(locs.len());
    for (i, loc) in locs.iter().enumerate() {
        let (rg, az) = (loc.x, loc.y);
        let (r_scp, rdot_scp) = scp_contours[i];

        // Polar angle and its derivative with respect to time
        let theta = pfa.polar_ang_poly.eval(t_coa[i]);
        let dtheta_dt = dtheta_poly.eval(t_coa[i]);

        // Polar aperture scale factor and its derivative with respect to
        // polar angle
        let ksf = pfa.spatial_freq_sf_poly.eval(theta);
        let dksf_dtheta = dksf_poly.eval(theta);

        // Spatial frequency phase slopes
        let (sin_theta, cos_theta) = theta.sin_cos();
        let dphi_dka = rg * cos_theta + az * sin_theta;
        let dphi_dkc = -rg * sin_theta + az * cos_theta;

        r.push(r_scp + ksf * dphi_dka);
        rdot.push(rdot_scp + (dksf_dtheta * dphi_dka + ksf * dphi_dkc) * dtheta_dt);
    }
    (r, rdot)
}

/// Computes the COA projection sets for the given image grid locations.
///
/// A projection set carries everything needed to project one grid location
/// along its R/Rdot contour: the COA time, the sensor state, and the contour
/// range and range rate.
///
/// # Errors
/// [`ProjectionError::UnsupportedGrid`] when the metadata grid type and
/// image formation algorithm have no R/Rdot implementation.
pub fn compute_projection_sets(
    meta: &MetadataParams,
    locs: &[Vector2<f64>],
) -> Result<ProjectionSets> {
    let t_coa = compute_coa_time(meta, locs);
    let coa = compute_coa_pos_vel(meta, &t_coa);
    let (r, rdot) = compute_coa_r_rdot(meta, locs, &t_coa, &coa)?;

    Ok(match coa {
        CoaPosVels::Monostatic(states) => ProjectionSets::Monostatic(
            states
                .into_iter()
                .zip(t_coa)
                .zip(r.into_iter().zip(rdot))
                .map(|((state, t), (r, rdot))| MonoProjectionSet {
                    t_coa: t,
                    arp: state.arp,
                    varp: state.varp,
                    r,
                    rdot,
                })
                .collect(),
        ),
        CoaPosVels::Bistatic(states) => ProjectionSets::Bistatic(
            states
                .into_iter()
                .zip(t_coa)
                .zip(r.into_iter().zip(rdot))
                .map(|((state, t), (r_avg, rdot_avg))| BiProjectionSet {
                    t_coa: t,
                    tx: state.tx,
                    tr: state.tr,
                    xmt: state.xmt,
                    vxmt: state.vxmt,
                    rcv: state.rcv,
                    vrcv: state.vrcv,
                    r_avg,
                    rdot_avg,
                })
                .collect(),
        ),
    })
}
