/*!
segmentation3d
==============

**segmentation3d** keeps several geometric representations of the same
anatomical region together (a [`Segment`](segment::Segment)) and converts
between them. The main conversion rasterizes a closed triangulated surface
into a binary labelmap sampled on an oriented voxel grid.

```
use segmentation3d::conversion::{ConversionParameters, SegmentationConverter};
use segmentation3d::math::Point;
use segmentation3d::segment::{Representation, Segment};
use segmentation3d::shape::SurfaceMesh;

let mesh = SurfaceMesh::uv_sphere(Point::new(0.0, 0.0, 0.0), 5.0, 24, 12);
let mut segment = Segment::new();
segment.add_representation(
    Representation::CLOSED_SURFACE,
    Representation::ClosedSurface(mesh),
);

let converter = SegmentationConverter::with_default_rules();
converter
    .convert_segment(
        &mut segment,
        Representation::CLOSED_SURFACE,
        Representation::BINARY_LABELMAP,
        &ConversionParameters::default(),
    )
    .unwrap();

let labelmap = segment
    .representation(Representation::BINARY_LABELMAP)
    .and_then(Representation::as_binary_labelmap)
    .unwrap();
assert!(labelmap.count_nonzero() > 0);
```
*/

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![deny(unused_qualifications)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod conversion;
pub mod geometry;
pub mod rasterization;
pub mod segment;
pub mod shape;
pub mod utils;

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use na::{Matrix3, Matrix4, Point3, Vector3};

    /// The scalar type used throughout this crate.
    pub use f64 as Real;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The matrix type.
    pub use Matrix3 as Matrix;

    /// The homogeneous transformation matrix type.
    pub use Matrix4 as HomogeneousMatrix;
}
