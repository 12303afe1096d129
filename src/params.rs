//! Metadata and ensemble value types for the projection engine.
//!
//! Everything here is an immutable value aggregate: constructed from the
//! collection metadata or an intermediate computation, read, and discarded
//! within a single projection call. Parameters whose presence depends on the
//! collect type are carried in enums so that reading a bistatic field from a
//! monostatic ensemble is a compile error rather than a runtime surprise.

use nalgebra::{Matrix2, Vector3};

use crate::error::{validate_unit_vector, ProjectionError, Result};
use crate::geodetic::wgs84_up;
use crate::poly::{Polynomial, Polynomial2d, XyzPolynomial};

/// Collection type of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectType {
    /// Single aperture reference point for transmit and receive
    Monostatic,
    /// Separate transmit and receive aperture phase centers
    Bistatic,
}

/// Side of the ground track the sensor images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideOfTrack {
    /// Left-looking collection
    Left,
    /// Right-looking collection
    Right,
}

impl SideOfTrack {
    /// Look direction sign: +1 for left-looking, -1 for right-looking.
    ///
    /// This sign enters the slant-plane normal computations and the azimuth
    /// branch of the monostatic ground-plane projection, and must be the same
    /// mapping everywhere.
    #[inline]
    pub const fn look(self) -> f64 {
        match self {
            SideOfTrack::Left => 1.0,
            SideOfTrack::Right => -1.0,
        }
    }
}

/// SICD image grid type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridType {
    RgAzim,
    RgZero,
    XrgYcr,
    XctYat,
    Plane,
}

/// Image formation algorithm used to form the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormationAlgorithm {
    Pfa,
    RgAzComp,
    Other,
}

/// Polar Format Algorithm polynomials.
#[derive(Debug, Clone, PartialEq)]
pub struct PfaParams {
    /// Polar angle in radians versus time in seconds from collect start
    pub polar_ang_poly: Polynomial,
    /// Polar aperture scale factor versus polar angle
    pub spatial_freq_sf_poly: Polynomial,
}

/// Sensor ephemerides and SCP center-of-aperture state, per collect type.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectGeometry {
    /// Monostatic collection: one aperture reference point
    Monostatic {
        /// ARP position versus time; the derivative gives velocity
        arp_poly: XyzPolynomial,
        /// ARP position at the SCP center of aperture time
        arp_scp_coa: Vector3<f64>,
        /// ARP velocity at the SCP center of aperture time
        varp_scp_coa: Vector3<f64>,
    },
    /// Bistatic collection: separate transmit and receive phase centers
    Bistatic {
        /// Transmit APC position versus time
        xmt_poly: XyzPolynomial,
        /// Receive APC position versus time
        rcv_poly: XyzPolynomial,
        /// Geometric reference point position versus time
        grp_poly: XyzPolynomial,
        /// Transmit APC position at the SCP COA transmit time
        xmt_scp_coa: Vector3<f64>,
        /// Transmit APC velocity at the SCP COA transmit time
        vxmt_scp_coa: Vector3<f64>,
        /// Receive APC position at the SCP COA receive time
        rcv_scp_coa: Vector3<f64>,
        /// Receive APC velocity at the SCP COA receive time
        vrcv_scp_coa: Vector3<f64>,
    },
}

/// Metadata parameters relevant to projection, extracted from SICD collection
/// metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataParams {
    /// Scene center point, ECEF meters
    pub scp: Vector3<f64>,
    /// Scene center point geodetic latitude in degrees
    pub scp_lat: f64,
    /// Scene center point longitude in degrees
    pub scp_lon: f64,
    /// Scene center point height above the WGS-84 ellipsoid in meters
    pub scp_hae: f64,
    /// Unit vector spanning the image plane in the increasing-row direction
    pub u_row: Vector3<f64>,
    /// Unit vector spanning the image plane in the increasing-column direction
    pub u_col: Vector3<f64>,
    /// Side of track of the collection
    pub side_of_track: SideOfTrack,
    /// Image grid type
    pub grid_type: GridType,
    /// Image formation algorithm
    pub ifa: ImageFormationAlgorithm,
    /// Center of aperture time in seconds versus image grid location
    pub ct_coa: Polynomial2d,
    /// Polar format polynomials, required for the RGAZIM/PFA grid
    pub pfa: Option<PfaParams>,
    /// Collect-type-specific ephemerides and SCP COA state
    pub geometry: CollectGeometry,
}

impl MetadataParams {
    /// Collection type implied by the geometry parameters.
    pub fn collect_type(&self) -> CollectType {
        match self.geometry {
            CollectGeometry::Monostatic { .. } => CollectType::Monostatic,
            CollectGeometry::Bistatic { .. } => CollectType::Bistatic,
        }
    }

    /// Whether this is a monostatic collection.
    pub fn is_monostatic(&self) -> bool {
        self.collect_type() == CollectType::Monostatic
    }

    /// Look direction sign from the side of track.
    #[inline]
    pub fn look(&self) -> f64 {
        self.side_of_track.look()
    }

    /// Unit vector in the increasing-height direction at the SCP.
    pub fn scp_up(&self) -> Vector3<f64> {
        wgs84_up(self.scp_lat, self.scp_lon)
    }

    /// Checks the image plane invariants: `u_row` and `u_col` must have unit
    /// length and must not be collinear.
    pub fn validate(&self) -> Result<()> {
        validate_unit_vector(&self.u_row, "uRow", 1e-6)?;
        validate_unit_vector(&self.u_col, "uCol", 1e-6)?;
        let cos_theta = self.u_row.dot(&self.u_col);
        if 1.0 - cos_theta * cos_theta <= f64::EPSILON {
            return Err(ProjectionError::DegenerateGeometry {
                calculation: "image plane basis",
                reason: format!("uRow and uCol are collinear (cos = {cos_theta})"),
            });
        }
        Ok(())
    }
}

/// Monostatic sensor state at one center of aperture time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoPosVel {
    /// ARP position at COA
    pub arp: Vector3<f64>,
    /// ARP velocity at COA
    pub varp: Vector3<f64>,
}

/// Bistatic sensor state at one center of aperture time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiPosVel {
    /// Geometric reference point position at COA
    pub grp: Vector3<f64>,
    /// Transmit time, COA time minus the GRP one-way delay
    pub tx: f64,
    /// Receive time, COA time plus the GRP one-way delay
    pub tr: f64,
    /// Transmit APC position at the transmit time
    pub xmt: Vector3<f64>,
    /// Transmit APC velocity at the transmit time
    pub vxmt: Vector3<f64>,
    /// Receive APC position at the receive time
    pub rcv: Vector3<f64>,
    /// Receive APC velocity at the receive time
    pub vrcv: Vector3<f64>,
}

impl BiPosVel {
    #[inline]
    pub(crate) fn apcs(&self) -> BiApcState {
        BiApcState {
            xmt: self.xmt,
            vxmt: self.vxmt,
            rcv: self.rcv,
            vrcv: self.vrcv,
        }
    }
}

/// Ensemble of COA sensor positions and velocities for a batch of grid
/// locations.
#[derive(Debug, Clone, PartialEq)]
pub enum CoaPosVels {
    /// One ARP state per grid location
    Monostatic(Vec<MonoPosVel>),
    /// One transmit/receive APC state per grid location
    Bistatic(Vec<BiPosVel>),
}

impl CoaPosVels {
    /// Number of grid locations covered by the ensemble.
    pub fn len(&self) -> usize {
        match self {
            CoaPosVels::Monostatic(v) => v.len(),
            CoaPosVels::Bistatic(v) => v.len(),
        }
    }

    /// Whether the ensemble is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Monostatic COA projection set for one image grid location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoProjectionSet {
    /// Center of aperture time in seconds from collect start
    pub t_coa: f64,
    /// ARP position at COA
    pub arp: Vector3<f64>,
    /// ARP velocity at COA
    pub varp: Vector3<f64>,
    /// Range from the ARP to the R/Rdot contour in meters
    pub r: f64,
    /// Range rate relative to the ARP in meters per second
    pub rdot: f64,
}

/// Bistatic COA projection set for one image grid location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiProjectionSet {
    /// Center of aperture time in seconds from collect start
    pub t_coa: f64,
    /// Transmit time
    pub tx: f64,
    /// Receive time
    pub tr: f64,
    /// Transmit APC position at the transmit time
    pub xmt: Vector3<f64>,
    /// Transmit APC velocity at the transmit time
    pub vxmt: Vector3<f64>,
    /// Receive APC position at the receive time
    pub rcv: Vector3<f64>,
    /// Receive APC velocity at the receive time
    pub vrcv: Vector3<f64>,
    /// Average of the transmit and receive ranges in meters
    pub r_avg: f64,
    /// Average of the transmit and receive range rates in meters per second
    pub rdot_avg: f64,
}

impl BiProjectionSet {
    #[inline]
    pub(crate) fn apcs(&self) -> BiApcState {
        BiApcState {
            xmt: self.xmt,
            vxmt: self.vxmt,
            rcv: self.rcv,
            vrcv: self.vrcv,
        }
    }
}

/// Ensemble of COA projection sets for a batch of grid locations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionSets {
    /// One monostatic projection set per grid location
    Monostatic(Vec<MonoProjectionSet>),
    /// One bistatic projection set per grid location
    Bistatic(Vec<BiProjectionSet>),
}

impl ProjectionSets {
    /// Number of grid locations covered by the ensemble.
    pub fn len(&self) -> usize {
        match self {
            ProjectionSets::Monostatic(v) => v.len(),
            ProjectionSets::Bistatic(v) => v.len(),
        }
    }

    /// Whether the ensemble is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Transmit and receive APC positions and velocities, the subset of a COA
/// state needed for scene-point range parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BiApcState {
    pub xmt: Vector3<f64>,
    pub vxmt: Vector3<f64>,
    pub rcv: Vector3<f64>,
    pub vrcv: Vector3<f64>,
}

/// Range and range-rate parameters of a scene point relative to the COA
/// aperture phase centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePointRRdotParams {
    /// Average of transmit and receive ranges to the point in meters
    pub r_avg: f64,
    /// Average of transmit and receive range rates in meters per second
    pub rdot_avg: f64,
    /// Bistatic pointing vector, the average of the APC unit pointing vectors
    pub bp: Vector3<f64>,
    /// Time derivative of the bistatic pointing vector
    pub bp_dot: Vector3<f64>,
    /// Slant plane unit normal at the point
    pub u_spn: Vector3<f64>,
}

/// Ground plane basis vectors and R/Rdot sensitivity matrices at a scene
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePointGpXyParams {
    /// Ground plane X basis vector, the in-plane component of the pointing
    pub u_gx: Vector3<f64>,
    /// Ground plane Y basis vector
    pub u_gy: Vector3<f64>,
    /// Maps ground plane displacements to (range, range rate) displacements
    pub m_rrdot_gpxy: Matrix2<f64>,
    /// Inverse of `m_rrdot_gpxy`
    pub m_gpxy_rrdot: Matrix2<f64>,
}

/// Tolerances for the iterative bistatic R/Rdot to ground plane solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BistaticParams {
    /// Ground plane displacement threshold in meters
    pub delta_gp_gpp: f64,
    /// Maximum number of iterations
    pub maxiter: usize,
}

impl Default for BistaticParams {
    fn default() -> Self {
        Self {
            delta_gp_gpp: 0.010,
            maxiter: 10,
        }
    }
}

/// Tolerances for the scene-to-image iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneToImageParams {
    /// Scene displacement threshold in meters
    pub delta_gp_s2i: f64,
    /// Maximum number of outer iterations
    pub maxiter: usize,
    /// Inner bistatic ground plane solver tolerances
    pub bistatic: BistaticParams,
}

impl Default for SceneToImageParams {
    fn default() -> Self {
        Self {
            delta_gp_s2i: 0.001,
            maxiter: 10,
            bistatic: BistaticParams::default(),
        }
    }
}

/// Tolerances for the constant-HAE surface projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaeSurfaceParams {
    /// Height convergence threshold in meters
    pub delta_hae_max: f64,
    /// Maximum number of ground plane refinements
    pub nlim: usize,
    /// Inner bistatic ground plane solver tolerances
    pub bistatic: BistaticParams,
}

impl Default for HaeSurfaceParams {
    fn default() -> Self {
        Self {
            delta_hae_max: 1.0,
            nlim: 3,
            bistatic: BistaticParams::default(),
        }
    }
}
