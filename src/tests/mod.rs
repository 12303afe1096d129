
use nalgebra::Vector3;

use crate::constants::SPEED_OF_LIGHT;
use crate::geodetic::geodetic_to_ecef;
use crate::params::{
    CollectGeometry, GridType, ImageFormationAlgorithm, MetadataParams, PfaParams, SideOfTrack,
};
use crate::poly::{Polynomial, Polynomial2d, XyzPolynomial};

/// Minimal monostatic collection: SCP at the ECEF origin, sensor 100 km
/// overhead drifting in +X, identity image plane basis.
pub(crate) fn identity_mono() -> MetadataParams {
    MetadataParams {
        scp: Vector3::zeros(),
        scp_lat: 0.0,
        scp_lon: 0.0,
        scp_hae: 0.0,
        u_row: Vector3::new(1.0, 0.0, 0.0),
        u_col: Vector3::new(0.0, 1.0, 0.0),
        side_of_track: SideOfTrack::Right,
        grid_type: GridType::RgAzim,
        ifa: ImageFormationAlgorithm::Pfa,
        ct_coa: Polynomial2d::constant(0.0),
        pfa: Some(PfaParams {
            polar_ang_poly: Polynomial::new(vec![0.0, 0.001]),
            spatial_freq_sf_poly: Polynomial::constant(1.0),
        }),
        geometry: CollectGeometry::Monostatic {
            arp_poly: XyzPolynomial::new(vec![
                Vector3::new(0.0, 0.0, 100_000.0),
                Vector3::new(100.0, 0.0, 0.0),
            ]),
            arp_scp_coa: Vector3::new(0.0, 0.0, 100_000.0),
            varp_scp_coa: Vector3::new(100.0, 0.0, 0.0),
        },
    }
}

/// Broadside monostatic collection over the equator: SCP on the WGS-84
/// surface at (0N, 0E), sensor 500 km up and 100 km west of the SCP flying
/// north at 7.5 km/s. The time and polar angle polynomials are consistent
/// with that geometry, so scene-to-image round trips converge.
pub(crate) fn broadside_mono() -> MetadataParams {
    let scp = geodetic_to_ecef(0.0, 0.0, 0.0);
    let arp = scp + Vector3::new(500_000.0, -100_000.0, 0.0);
    let varp = Vector3::new(0.0, 0.0, 7_500.0);

    let range_vec = scp - arp;
    let r_scp = range_vec.norm();
    let u_row = range_vec / r_scp;
    let u_col = Vector3::new(0.0, 0.0, 1.0);

    MetadataParams {
        scp,
        scp_lat: 0.0,
        scp_lon: 0.0,
        scp_hae: 0.0,
        u_row,
        u_col,
        side_of_track: SideOfTrack::Right,
        grid_type: GridType::RgAzim,
        ifa: ImageFormationAlgorithm::Pfa,
        // Broadside: the COA time tracks the along-track grid coordinate
        ct_coa: Polynomial2d::new(vec![vec![0.0, 1.0 / varp.z]]),
        pfa: Some(PfaParams {
            // Polar angle rate consistent with broadside motion: the contour
            // range rate cancels the SCP range rate drift along track
            polar_ang_poly: Polynomial::new(vec![0.0, -varp.z / r_scp]),
            spatial_freq_sf_poly: Polynomial::constant(1.0),
        }),
        geometry: CollectGeometry::Monostatic {
            arp_poly: XyzPolynomial::new(vec![arp, varp]),
            arp_scp_coa: arp,
            varp_scp_coa: varp,
        },
    }
}

/// Broadside bistatic collection over the equator: transmit and receive APCs
/// at different standoffs, both flying north, geometric reference point at
/// the SCP.
pub(crate) fn broadside_bi() -> MetadataParams {
    let scp = geodetic_to_ecef(0.0, 0.0, 0.0);

    let xmt0 = scp + Vector3::new(600_000.0, -200_000.0, 0.0);
    let vxmt = Vector3::new(0.0, 0.0, 7_600.0);
    let rcv0 = scp + Vector3::new(500_000.0, 100_000.0, 0.0);
    let vrcv = Vector3::new(0.0, 0.0, 7_300.0);

    // SCP COA APC states with the one-way delay applied, matching what the
    // COA position/velocity computation produces at t = 0
    let r_x0 = (xmt0 - scp).norm();
    let tx = -r_x0 / SPEED_OF_LIGHT;
    let xmt_scp_coa = xmt0 + tx * vxmt;
    let r_r0 = (rcv0 - scp).norm();
    let tr = r_r0 / SPEED_OF_LIGHT;
    let rcv_scp_coa = rcv0 + tr * vrcv;

    // Increasing-range direction from the bistatic pointing vector at the SCP
    let u_xmt = (xmt_scp_coa - scp) / (xmt_scp_coa - scp).norm();
    let u_rcv = (rcv_scp_coa - scp) / (rcv_scp_coa - scp).norm();
    let bp = 0.5 * (u_xmt + u_rcv);
    let u_row = -bp / bp.norm();
    let u_col = Vector3::new(0.0, 0.0, 1.0);

    let dtheta_dt = -0.5 * (vxmt.norm() / r_x0 + vrcv.norm() / r_r0);

    MetadataParams {
        scp,
        scp_lat: 0.0,
        scp_lon: 0.0,
        scp_hae: 0.0,
        u_row,
        u_col,
        side_of_track: SideOfTrack::Right,
        grid_type: GridType::RgAzim,
        ifa: ImageFormationAlgorithm::Pfa,
        ct_coa: Polynomial2d::new(vec![vec![0.0, 1.0 / 7_500.0]]),
        pfa: Some(PfaParams {
            polar_ang_poly: Polynomial::new(vec![0.0, dtheta_dt]),
            spatial_freq_sf_poly: Polynomial::constant(1.0),
        }),
        geometry: CollectGeometry::Bistatic {
            xmt_poly: XyzPolynomial::new(vec![xmt0, vxmt]),
            rcv_poly: XyzPolynomial::new(vec![rcv0, vrcv]),
            grp_poly: XyzPolynomial::constant(scp),
            xmt_scp_coa,
            vxmt_scp_coa: vxmt,
            rcv_scp_coa,
            vrcv_scp_coa: vrcv,
        },
    }
}
