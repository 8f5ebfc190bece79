use crate::geometry::GeometryError;
use alloc::string::String;

/// The broad families of conversion failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A representation of the wrong kind was supplied, or the output object
    /// could not be built.
    InputInvalid,
    /// The output grid derived for the conversion is degenerate.
    GeometryInvalid,
    /// A rule, a conversion path or a representation class is unavailable.
    MissingDependency,
}

/// Errors raised while converting a representation into another.
///
/// A failed conversion never modifies its target representation.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ConversionError {
    /// The source representation is not of the class the rule reads.
    #[error("the rule expects a {expected} source representation but got a {found}.")]
    InvalidSource {
        /// The class the rule reads.
        expected: &'static str,
        /// The class actually supplied.
        found: &'static str,
    },
    /// The target representation is not of the class the rule writes.
    #[error("the rule writes a {expected} target representation but got a {found}.")]
    InvalidTarget {
        /// The class the rule writes.
        expected: &'static str,
        /// The class actually supplied.
        found: &'static str,
    },
    /// No object could be constructed for an intermediate or target representation.
    #[error("cannot construct a representation object for the kind {kind}.")]
    RepresentationConstruction {
        /// The representation kind.
        kind: String,
    },
    /// The derived output geometry is degenerate.
    #[error("invalid output geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),
    /// The input surface has boundary edges and does not enclose a solid.
    #[error("the closed surface has {boundary_edges} boundary edges.")]
    OpenSurface {
        /// The number of edges used by an odd number of triangles.
        boundary_edges: usize,
    },
    /// The segment has no representation of the requested source kind.
    #[error("the segment has no {kind} representation.")]
    MissingSourceRepresentation {
        /// The representation kind.
        kind: String,
    },
    /// No chain of registered rules leads from the source to the target kind.
    #[error("no conversion path from {source_kind} to {target_kind}.")]
    NoConversionPath {
        /// The kind of the existing representation.
        source_kind: String,
        /// The requested kind.
        target_kind: String,
    },
}

impl ConversionError {
    /// The family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConversionError::InvalidSource { .. }
            | ConversionError::InvalidTarget { .. }
            | ConversionError::RepresentationConstruction { .. }
            | ConversionError::OpenSurface { .. } => ErrorCategory::InputInvalid,
            ConversionError::InvalidGeometry(_) => ErrorCategory::GeometryInvalid,
            ConversionError::MissingSourceRepresentation { .. }
            | ConversionError::NoConversionPath { .. } => ErrorCategory::MissingDependency,
        }
    }
}
