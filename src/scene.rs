//! Scene-to-image iteration and constant-HAE surface projection.

use nalgebra::{Vector2, Vector3};

use crate::coa::{compute_projection_sets, compute_scp_coa_slant_plane_normal};
use crate::error::{ProjectionError, Result};
use crate::geodetic::{ecef_to_geodetic, geodetic_to_ecef, wgs84_up};
use crate::ground_plane::{
    project_to_plane_bi, project_to_plane_mono, pt_r_rdot_parameters, r_rdot_to_ground_plane_bi,
    r_rdot_to_ground_plane_mono,
};
use crate::image_plane::GridTransform;
use crate::params::{
    BistaticParams, HaeSurfaceParams, MetadataParams, ProjectionSets, SceneToImageParams,
};

/// Maps scene points to the image grid locations whose projection contours
/// pass through them.
///
/// Each point iterates independently. Starting from the scene point itself,
/// the current ground estimate is projected along the SCP slant plane normal
/// onto the image plane, the grid location there yields a COA projection set,
/// and the set is projected back onto the plane through the scene point with
/// its spherical-earth normal. The ground estimate moves by the remaining
/// displacement until it drops to `delta_gp_s2i`.
///
/// # Arguments
/// - `meta`: metadata parameters relevant to projection
/// - `scene_points`: scene point positions, ECEF meters
/// - `params`: outer and (bistatic only) inner iteration tolerances
///
/// # Returns
/// `(locs, delta_gp, success)`: grid locations (NaN where no solution was
/// found), scene displacement magnitudes, and whether every point converged
/// with every intermediate plane projection valid.
///
/// # Errors
/// [`ProjectionError::DegenerateGeometry`] when the image plane basis is
/// collinear or the slant plane is parallel to the image plane, and
/// [`ProjectionError::UnsupportedGrid`] for metadata without an R/Rdot
/// implementation.
pub fn scene_to_image(
    meta: &MetadataParams,
    scene_points: &[Vector3<f64>],
    params: &SceneToImageParams,
) -> Result<(Vec<Vector2<f64>>, Vec<f64>, bool)> {
    let transform = GridTransform::new(meta)?;

    // Projection direction and scale factor onto the image plane
    let u_proj = compute_scp_coa_slant_plane_normal(meta);
    let ipn = meta.u_row.cross(&meta.u_col);
    let u_ipn = ipn / ipn.norm();
    let sf = u_proj.dot(&u_ipn);
    if sf.abs() < f64::EPSILON {
        return Err(ProjectionError::DegenerateGeometry {
            calculation: "scene to image",
            reason: "slant plane and image plane are perpendicular".to_string(),
        });
    }

    let look = meta.look();
    let n = scene_points.len();

    // Spherical earth ground plane normal per point
    let u_gpn: Vec<Vector3<f64>> = scene_points.iter().map(|s| s / s.norm()).collect();

    let mut locs = vec![Vector2::repeat(f64::NAN); n];
    let mut delta_gp = vec![f64::NAN; n];
    let mut delta_p = vec![Vector3::repeat(f64::NAN); n];
    let mut inner_ok = vec![false; n];
    let mut g: Vec<Vector3<f64>> = scene_points.to_vec();
    let mut active: Vec<usize> = (0..n).collect();
    let mut success = false;

    for _ in 0..params.maxiter {
        // Project ground estimates to the image plane and take grid locations
        let active_locs: Vec<Vector2<f64>> = active
            .iter()
            .map(|&i| {
                let dist = (meta.scp - g[i]).dot(&u_ipn) / sf;
                transform.apply(meta, &(g[i] + dist * u_proj))
            })
            .collect();

        let sets = compute_projection_sets(meta, &active_locs)?;

        // Precise projection back onto the plane through each scene point
        match &sets {
            ProjectionSets::Monostatic(sets) => {
                for (k, &i) in active.iter().enumerate() {
                    let p = project_to_plane_mono(look, &sets[k], &scene_points[i], &u_gpn[i]);
                    inner_ok[i] = p.iter().all(|c| c.is_finite());
                    locs[i] = active_locs[k];
                    delta_p[i] = scene_points[i] - p;
                    delta_gp[i] = delta_p[i].norm();
                }
            }
            ProjectionSets::Bistatic(sets) => {
                for (k, &i) in active.iter().enumerate() {
                    let (p, _, converged) = project_to_plane_bi(
                        meta,
                        &sets[k],
                        &scene_points[i],
                        &u_gpn[i],
                        &params.bistatic,
                    )?;
                    inner_ok[i] = converged;
                    locs[i] = active_locs[k];
                    delta_p[i] = scene_points[i] - p;
                    delta_gp[i] = delta_p[i].norm();
                }
            }
        }

        // Freeze converged points, move the rest by the remaining displacement
        active.retain(|&i| delta_gp[i] > params.delta_gp_s2i);
        for &i in &active {
            g[i] += delta_p[i];
        }

        success = delta_gp.iter().all(|d| *d <= params.delta_gp_s2i)
            && inner_ok.iter().all(|&ok| ok);
        if success {
            break;
        }
    }
    Ok((locs, delta_gp, success))
}

/// Projects R/Rdot contours to a surface of constant height above the WGS-84
/// ellipsoid.
///
/// The surface is approximated by a sequence of ground planes. The first
/// plane passes through the SCP shifted to `hae0` along its local up; each
/// refinement re-anchors the plane at the projected point corrected by its
/// height error. After at most `nlim` refinements the remaining height error
/// is removed by a straight-line step along the local slant plane normal and
/// a final snap to the `hae0` surface.
///
/// # Arguments
/// - `meta`: metadata parameters relevant to projection
/// - `sets`: COA projection sets to project
/// - `hae0`: surface height above the ellipsoid in meters
/// - `params`: height threshold, refinement cap, and bistatic solver
///   tolerances
///
/// # Returns
/// `(spp, delta_hae, success)`: surface points, ground plane height errors
/// before the final refinement, and whether every element converged with
/// every plane projection valid.
///
/// # Errors
/// [`ProjectionError::DegenerateGeometry`] if a bistatic sensitivity matrix
/// is singular.
pub fn r_rdot_to_constant_hae_surface(
    meta: &MetadataParams,
    sets: &ProjectionSets,
    hae0: f64,
    params: &HaeSurfaceParams,
) -> Result<(Vec<Vector3<f64>>, Vec<f64>, bool)> {
    let look = meta.look();
    let n = sets.len();

    // Ground plane 1: through the SCP shifted to the target height
    let u_gpn0 = meta.scp_up();
    let gref0 = meta.scp + (hae0 - meta.scp_hae) * u_gpn0;

    let mut gref = vec![gref0; n];
    let mut u_gpn = vec![u_gpn0; n];
    let mut gpp = vec![Vector3::repeat(f64::NAN); n];
    let mut u_up = vec![Vector3::repeat(f64::NAN); n];
    let mut delta_hae = vec![f64::NAN; n];
    let mut plane_ok = vec![false; n];
    let mut active: Vec<usize> = (0..n).collect();

    for _ in 0..params.nlim {
        match sets {
            ProjectionSets::Monostatic(sets) => {
                for &i in &active {
                    gpp[i] = project_to_plane_mono(look, &sets[i], &gref[i], &u_gpn[i]);
                    plane_ok[i] = gpp[i].iter().all(|c| c.is_finite());
                }
            }
            ProjectionSets::Bistatic(sets) => {
                for &i in &active {
                    let (p, _, converged) =
                        project_to_plane_bi(meta, &sets[i], &gref[i], &u_gpn[i], &params.bistatic)?;
                    gpp[i] = p;
                    plane_ok[i] = converged;
                }
            }
        }

        // Height error and local up direction at each ground plane point
        for &i in &active {
            let (lat, lon, hae) = ecef_to_geodetic(&gpp[i]);
            u_up[i] = wgs84_up(lat, lon);
            delta_hae[i] = hae - hae0;
        }

        if delta_hae.iter().all(|d| *d <= params.delta_hae_max)
            && plane_ok.iter().all(|&ok| ok)
        {
            break;
        }

        // Re-anchor the plane for the elements still above threshold
        active.retain(|&i| delta_hae[i] > params.delta_hae_max);
        for &i in &active {
            gref[i] = gpp[i] - delta_hae[i] * u_up[i];
            u_gpn[i] = u_up[i];
        }
    }

    // Straight-line refinement along the slant plane normal at each point,
    // then snap to the hae0 surface
    let mut spp = Vec::with_capacity(n);
    match sets {
        ProjectionSets::Monostatic(sets) => {
            for i in 0..n {
                let spn = look * sets[i].varp.cross(&(gpp[i] - sets[i].arp));
                let u_spn = spn / spn.norm();
                spp.push(refine_to_surface(&gpp[i], &u_up[i], &u_spn, delta_hae[i], hae0));
            }
        }
        ProjectionSets::Bistatic(sets) => {
            for i in 0..n {
                let pt = pt_r_rdot_parameters(look, &sets[i].apcs(), &gpp[i]);
                spp.push(refine_to_surface(
                    &gpp[i],
                    &u_up[i],
                    &pt.u_spn,
                    delta_hae[i],
                    hae0,
                ));
            }
        }
    }

    let success = delta_hae.iter().all(|d| *d <= params.delta_hae_max)
        && plane_ok.iter().all(|&ok| ok);
    Ok((spp, delta_hae, success))
}

fn refine_to_surface(
    gpp: &Vector3<f64>,
    u_up: &Vector3<f64>,
    u_spn: &Vector3<f64>,
    delta_hae: f64,
    hae0: f64,
) -> Vector3<f64> {
    let sf = u_up.dot(u_spn);
    let slp = gpp - (delta_hae * u_spn) / sf;
    let (lat, lon, _hae) = ecef_to_geodetic(&slp);
    geodetic_to_ecef(lat, lon, hae0)
}

/// Projects image grid locations to an arbitrary ground plane.
///
/// Composes the projection-set pipeline with the plane projection matching
/// the collect type. Bistatic elements that fail to converge keep their
/// best-effort positions.
pub fn image_to_ground_plane(
    meta: &MetadataParams,
    locs: &[Vector2<f64>],
    gref: &Vector3<f64>,
    ugpn: &Vector3<f64>,
    bistatic: &BistaticParams,
) -> Result<Vec<Vector3<f64>>> {
    let sets = compute_projection_sets(meta, locs)?;
    match &sets {
        ProjectionSets::Monostatic(sets) => {
            Ok(r_rdot_to_ground_plane_mono(meta, sets, gref, ugpn))
        }
        ProjectionSets::Bistatic(sets) => {
            let (g, _, _) = r_rdot_to_ground_plane_bi(meta, sets, gref, ugpn, bistatic)?;
            Ok(g)
        }
    }
}

/// Projects image grid locations to a surface of constant height above the
/// WGS-84 ellipsoid.
///
/// Composes the projection-set pipeline with
/// [`r_rdot_to_constant_hae_surface`].
pub fn image_to_constant_hae_surface(
    meta: &MetadataParams,
    locs: &[Vector2<f64>],
    hae0: f64,
    params: &HaeSurfaceParams,
) -> Result<(Vec<Vector3<f64>>, Vec<f64>, bool)> {
    let sets = compute_projection_sets(meta, locs)?;
    r_rdot_to_constant_hae_surface(meta, &sets, hae0, params)
}
