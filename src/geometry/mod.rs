//! Oriented voxel grid geometry.
//!
//! An [`ImageGeometry`] maps integer voxel indices to physical (world)
//! coordinates through an origin, an orthonormal direction matrix and a
//! per-axis spacing. Voxel centers sit at integer indices; the cell of voxel
//! `i` spans `[i - 0.5, i + 0.5]` in continuous index space.

pub use self::error::GeometryError;
pub use self::image_extent::ImageExtent;
pub use self::image_geometry::ImageGeometry;

mod error;
mod geometry_string;
mod image_extent;
mod image_geometry;
