//! Canonical textual form of an [`ImageGeometry`].
//!
//! The string holds 22 fields, each terminated by `;`: the 16 entries of the
//! image-to-world matrix in row-major order, then the extent as
//! `imin;imax;jmin;jmax;kmin;kmax`. Floats use the shortest representation
//! that parses back to the same value.

use super::{GeometryError, ImageExtent, ImageGeometry};
use crate::math::{HomogeneousMatrix, Real};
use alloc::format;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

const NUM_MATRIX_FIELDS: usize = 16;
const NUM_EXTENT_FIELDS: usize = 6;

impl fmt::Display for ImageGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.image_to_world();

        for r in 0..4 {
            for c in 0..4 {
                write!(f, "{};", m[(r, c)])?;
            }
        }

        for e in self.extent().as_array() {
            write!(f, "{};", e)?;
        }

        Ok(())
    }
}

impl FromStr for ImageGeometry {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, GeometryError> {
        let s = s.trim();
        let s = s.strip_suffix(';').unwrap_or(s);
        let fields: Vec<&str> = s.split(';').map(str::trim).collect();

        if fields.len() != NUM_MATRIX_FIELDS + NUM_EXTENT_FIELDS {
            return Err(GeometryError::Parse {
                reason: format!(
                    "expected {} fields, found {}",
                    NUM_MATRIX_FIELDS + NUM_EXTENT_FIELDS,
                    fields.len()
                ),
            });
        }

        let mut m = HomogeneousMatrix::zeros();

        for (id, field) in fields[..NUM_MATRIX_FIELDS].iter().enumerate() {
            m[(id / 4, id % 4)] = field.parse::<Real>().map_err(|e| GeometryError::Parse {
                reason: format!("matrix element {} `{}`: {}", id, field, e),
            })?;
        }

        let mut extent = [0; NUM_EXTENT_FIELDS];

        for (id, field) in fields[NUM_MATRIX_FIELDS..].iter().enumerate() {
            extent[id] = field.parse::<i32>().map_err(|e| GeometryError::Parse {
                reason: format!("extent element {} `{}`: {}", id, field, e),
            })?;
        }

        ImageGeometry::from_image_to_world(&m, ImageExtent::from_array(extent))
    }
}
