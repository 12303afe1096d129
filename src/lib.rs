//! # sicd-projection
//!
//! `sicd-projection` implements the image projection math of the SICD
//! (Sensor Independent Complex Data) standard for complex SAR imagery:
//! converting between image grid locations, image plane points, and scene
//! points on or near the Earth surface.
//!
//! It includes:
//! - Image grid ↔ image plane conversions about the scene center point
//! - Center of aperture times and sensor state from polynomial ephemerides,
//!   monostatic and bistatic (one-step retarded transmit/receive times)
//! - R/Rdot contour generation for the RGAZIM grid formed with PFA
//! - Closed-form monostatic and iterative bistatic projection of R/Rdot
//!   contours onto arbitrary ground planes
//! - Iterative projection onto surfaces of constant height above the WGS-84
//!   ellipsoid
//! - The scene-to-image iteration composing all of the above
//!
//! The engine is a batch of pure functions over `nalgebra` vectors: inputs
//! are read-only metadata and point slices, outputs are freshly allocated.
//! Per-element projection failures surface as NaNs and `success` flags;
//! degenerate metadata surfaces as [`ProjectionError`].
//!
//! ## Quick example: a sensor 100 km above the scene center
//!
//! ```
//! use nalgebra::{Vector2, Vector3};
//! use sicd_projection::{
//!     compute_scp_coa_r_rdot, image_grid_to_image_plane_point, CollectGeometry, GridType,
//!     ImageFormationAlgorithm, MetadataParams, Polynomial2d, SideOfTrack, XyzPolynomial,
//! };
//!
//! let meta = MetadataParams {
//!     scp: Vector3::zeros(),
//!     scp_lat: 0.0,
//!     scp_lon: 0.0,
//!     scp_hae: 0.0,
//!     u_row: Vector3::new(1.0, 0.0, 0.0),
//!     u_col: Vector3::new(0.0, 1.0, 0.0),
//!     side_of_track: SideOfTrack::Right,
//!     grid_type: GridType::RgAzim,
//!     ifa: ImageFormationAlgorithm::Pfa,
//!     ct_coa: Polynomial2d::constant(0.0),
//!     pfa: None,
//!     geometry: CollectGeometry::Monostatic {
//!         arp_poly: XyzPolynomial::new(vec![
//!             Vector3::new(0.0, 0.0, 100_000.0),
//!             Vector3::new(100.0, 0.0, 0.0),
//!         ]),
//!         arp_scp_coa: Vector3::new(0.0, 0.0, 100_000.0),
//!         varp_scp_coa: Vector3::new(100.0, 0.0, 0.0),
//!     },
//! };
//!
//! let (r, rdot) = compute_scp_coa_r_rdot(&meta);
//! assert_eq!(r, 100_000.0);
//! assert_eq!(rdot, 0.0);
//!
//! let points = image_grid_to_image_plane_point(&meta, &[Vector2::new(0.0, 0.0)]);
//! assert_eq!(points[0], Vector3::zeros());
//! ```

pub mod coa;
pub mod constants;
pub mod error;
pub mod geodetic;
pub mod ground_plane;
pub mod image_plane;
pub mod params;
pub mod poly;
pub mod scene;

pub use coa::*;
pub use constants::*;
pub use error::*;
pub use geodetic::*;
pub use ground_plane::*;
pub use image_plane::*;
pub use params::*;
pub use poly::*;
pub use scene::*;

#[cfg(test)]
pub mod tests;
