use crate::math::Real;
use alloc::string::String;

/// Errors raised while building, deriving or parsing an [`ImageGeometry`](super::ImageGeometry).
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// Every spacing component must be finite and strictly positive.
    #[error("the spacing {0:?} must be finite and strictly positive on every axis.")]
    InvalidSpacing([Real; 3]),
    /// The origin contains a NaN or an infinite component.
    #[error("the image origin {0:?} is not finite.")]
    NonFiniteOrigin([Real; 3]),
    /// The direction matrix is not finite or cannot be inverted.
    #[error("the direction matrix is singular or not finite.")]
    InvalidDirections,
    /// Bounds mapped into voxel-index space are not finite or do not fit the index type.
    #[error("bounds mapped into voxel-index space are not finite or out of range.")]
    NonFiniteBounds,
    /// The extent computed for an output grid is inverted on at least one axis.
    #[error("the computed extent {0:?} is inverted.")]
    InvertedExtent([i32; 6]),
    /// The number of voxels of the extent does not fit in memory indices.
    #[error("the extent {0:?} has too many voxels to be allocated.")]
    TooManyVoxels([i32; 6]),
    /// A label buffer does not hold exactly one label per voxel of its geometry.
    #[error("expected {expected} labels, one per voxel, found {found}.")]
    LabelCountMismatch {
        /// The number of voxels of the geometry.
        expected: usize,
        /// The number of labels provided.
        found: usize,
    },
    /// Oversampling factors must be finite and strictly positive.
    #[error("the oversampling factor {0} must be finite and strictly positive.")]
    InvalidOversamplingFactor(Real),
    /// The textual geometry could not be parsed.
    #[error("malformed geometry string: {reason}")]
    Parse {
        /// What went wrong.
        reason: String,
    },
}
