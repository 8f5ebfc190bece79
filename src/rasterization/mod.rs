//! Scanline rasterization of closed surfaces into voxel volumes.
//!
//! The rasterizer works in continuous voxel-index space: triangles are mapped
//! through the world-to-index transform of the target grid, and every voxel
//! row is filled between consecutive surface crossings (even-odd rule).

pub use self::stencil::{rasterize, rasterize_into};

mod stencil;
