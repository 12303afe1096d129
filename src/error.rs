//! Error types for projection calculations

use thiserror::Error;

use crate::params::{GridType, ImageFormationAlgorithm};

/// Main error type for projection operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The (grid type, image formation algorithm) pair has no projection path
    #[error("No projection implemented for grid type {grid_type:?} formed with {ifa:?}")]
    UnsupportedGrid {
        /// Grid type from the collection metadata
        grid_type: GridType,
        /// Image formation algorithm from the collection metadata
        ifa: ImageFormationAlgorithm,
    },

    /// The collection geometry does not admit a solution
    #[error("Degenerate geometry in {calculation}: {reason}")]
    DegenerateGeometry {
        /// What calculation failed
        calculation: &'static str,
        /// Why it failed
        reason: String,
    },

    /// A vector that must have unit length does not
    #[error("{name} is not a unit vector (norm = {norm})")]
    NotAUnitVector {
        /// Name of the offending vector
        name: &'static str,
        /// Its actual norm
        norm: f64,
    },
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Validate that a vector has unit length to within `tol`
#[inline]
pub fn validate_unit_vector(
    v: &nalgebra::Vector3<f64>,
    name: &'static str,
    tol: f64,
) -> Result<()> {
    let norm = v.norm();
    if (norm - 1.0).abs() > tol {
        Err(ProjectionError::NotAUnitVector { name, norm })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_error_display() {
        let err = ProjectionError::UnsupportedGrid {
            grid_type: GridType::Plane,
            ifa: ImageFormationAlgorithm::Pfa,
        };
        assert_eq!(
            err.to_string(),
            "No projection implemented for grid type Plane formed with Pfa"
        );
    }

    #[test]
    fn test_validate_unit_vector() {
        assert!(validate_unit_vector(&Vector3::new(1.0, 0.0, 0.0), "uRow", 1e-9).is_ok());
        assert!(validate_unit_vector(&Vector3::new(0.0, 2.0, 0.0), "uRow", 1e-9).is_err());
        let err = validate_unit_vector(&Vector3::zeros(), "uCol", 1e-9).unwrap_err();
        assert!(err.to_string().contains("uCol"));
    }
}
