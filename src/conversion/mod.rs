//! Conversions between segment representations.
//!
//! A [`ConversionRule`] turns one representation kind into another. The
//! [`SegmentationConverter`] registers rules and chains them along the
//! cheapest path between two kinds. Rules read their options from
//! [`ConversionParameters`], a map of string-encoded named values.

pub use self::closed_surface_to_binary_labelmap::{
    ClosedSurfaceToBinaryLabelmapRule, LabelmapGeometry,
};
pub use self::converter::{ConversionPath, SegmentationConverter};
pub use self::error::{ConversionError, ErrorCategory};
pub use self::oversampling::{automatic_oversampling_factor, AUTOMATIC_OVERSAMPLING_TARGET_VOXELS};
pub use self::parameters::{
    ConversionParameter, ConversionParameters, Oversampling, AUTOMATIC_OVERSAMPLING,
    CROP_TO_REFERENCE_PARAMETER, OVERSAMPLING_FACTOR_PARAMETER, REFERENCE_GEOMETRY_PARAMETER,
};
pub use self::rule::ConversionRule;

mod closed_surface_to_binary_labelmap;
mod converter;
mod error;
mod oversampling;
mod parameters;
mod rule;
