//! The geometric objects a segment can be represented by.
//!
//! A [`SurfaceMesh`] is a triangulated boundary, expected to be closed, and a
//! [`LabelVolume`] is a dense grid of voxel labels.

pub use self::label_volume::{Label, LabelVolume};
pub use self::surface_mesh::{SurfaceMesh, SurfaceMeshBuilderError};

mod label_volume;
mod primitives;
mod surface_mesh;
