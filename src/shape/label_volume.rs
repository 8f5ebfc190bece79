use crate::bounding_volume::Aabb;
#[cfg(feature = "serde-serialize")]
use crate::geometry::GeometryError;
use crate::geometry::{ImageExtent, ImageGeometry};
use crate::math::Vector;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// The integer label stored in each voxel. Zero is background.
pub type Label = u8;

/// A dense voxel volume of labels: the binary-labelmap representation of a segment.
///
/// Labels are stored `x`-fastest over the extent of the geometry, one
/// [`Label`] per voxel.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-serialize",
    serde(try_from = "LabelVolumeFields", into = "LabelVolumeFields")
)]
#[derive(Clone, PartialEq)]
pub struct LabelVolume {
    geometry: ImageGeometry,
    labels: Vec<Label>,
}

impl fmt::Debug for LabelVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelVolume")
            .field("geometry", &self.geometry)
            .field("num_nonzero", &self.count_nonzero())
            .finish()
    }
}

impl Default for LabelVolume {
    fn default() -> Self {
        Self::new(ImageGeometry::default())
    }
}

impl LabelVolume {
    /// A background-filled volume sampled on `geometry`.
    pub fn new(geometry: ImageGeometry) -> Self {
        let labels = vec![0; geometry.extent().num_voxels()];
        Self { geometry, labels }
    }

    /// The sampling grid of this volume.
    #[inline]
    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    /// The voxel index box covered by this volume.
    #[inline]
    pub fn extent(&self) -> ImageExtent {
        self.geometry.extent()
    }

    /// Does this volume contain no voxel at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All the labels, `x`-fastest.
    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Mutable access to all the labels, `x`-fastest.
    #[inline]
    pub fn labels_mut(&mut self) -> &mut [Label] {
        &mut self.labels
    }

    /// The label of voxel `(i, j, k)`, or `None` outside of the extent.
    pub fn get(&self, i: i32, j: i32, k: i32) -> Option<Label> {
        self.extent()
            .linear_index(i, j, k)
            .map(|id| self.labels[id])
    }

    /// Sets the label of voxel `(i, j, k)`.
    ///
    /// Returns `false`, and does nothing, if the voxel is outside of the extent.
    pub fn set(&mut self, i: i32, j: i32, k: i32, label: Label) -> bool {
        match self.extent().linear_index(i, j, k) {
            Some(id) => {
                self.labels[id] = label;
                true
            }
            None => false,
        }
    }

    /// Sets every voxel to `label`.
    pub fn fill(&mut self, label: Label) {
        self.labels.fill(label);
    }

    /// The number of voxels with a label different from zero.
    pub fn count_nonzero(&self) -> usize {
        self.labels.iter().filter(|l| **l != 0).count()
    }

    /// Iterates through the indices of all the non-background voxels.
    pub fn nonzero_voxels(&self) -> impl Iterator<Item = Vector<i32>> + '_ {
        let extent = self.extent();
        let dims = extent.dimensions();

        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l != 0)
            .map(move |(id, _)| {
                let di = id % dims.x;
                let dj = (id / dims.x) % dims.y;
                let dk = id / (dims.x * dims.y);
                extent.mins + Vector::new(di as i32, dj as i32, dk as i32)
            })
    }

    /// The smallest extent containing every non-background voxel.
    pub fn nonzero_extent(&self) -> Option<ImageExtent> {
        let mut result = ImageExtent::empty();

        for ijk in self.nonzero_voxels() {
            result = result.merged(&ImageExtent::new(ijk, ijk));
        }

        (!result.is_empty()).then_some(result)
    }

    /// The part of this volume lying inside of `extent`.
    ///
    /// The result keeps the origin, spacing and directions of this volume;
    /// only its extent shrinks to the intersection of both extents (possibly empty).
    pub fn cropped(&self, extent: &ImageExtent) -> LabelVolume {
        let new_extent = self
            .extent()
            .intersection(extent)
            .unwrap_or_else(ImageExtent::empty);
        let mut result = LabelVolume::new(self.geometry.with_extent(new_extent));

        if new_extent.is_empty() {
            return result;
        }

        let row_len = new_extent.dimensions().x;

        for k in new_extent.mins.z..=new_extent.maxs.z {
            for j in new_extent.mins.y..=new_extent.maxs.y {
                let (Some(src), Some(dst)) = (
                    self.extent().linear_index(new_extent.mins.x, j, k),
                    new_extent.linear_index(new_extent.mins.x, j, k),
                ) else {
                    continue;
                };

                result.labels[dst..dst + row_len].copy_from_slice(&self.labels[src..src + row_len]);
            }
        }

        result
    }

    /// The world-space bounds of the voxel centers, `None` if the volume is empty.
    pub fn aabb(&self) -> Option<Aabb> {
        if self.is_empty() {
            None
        } else {
            Some(self.geometry.aabb())
        }
    }
}

/// The serialized form of a [`LabelVolume`], checked to hold one label per voxel.
#[cfg(feature = "serde-serialize")]
#[derive(Serialize, Deserialize)]
struct LabelVolumeFields {
    geometry: ImageGeometry,
    labels: Vec<Label>,
}

#[cfg(feature = "serde-serialize")]
impl From<LabelVolume> for LabelVolumeFields {
    fn from(volume: LabelVolume) -> Self {
        Self {
            geometry: volume.geometry,
            labels: volume.labels,
        }
    }
}

#[cfg(feature = "serde-serialize")]
impl TryFrom<LabelVolumeFields> for LabelVolume {
    type Error = GeometryError;

    fn try_from(fields: LabelVolumeFields) -> Result<Self, GeometryError> {
        let expected = fields.geometry.extent().num_voxels();
        if fields.labels.len() != expected {
            return Err(GeometryError::LabelCountMismatch {
                expected,
                found: fields.labels.len(),
            });
        }

        Ok(Self {
            geometry: fields.geometry,
            labels: fields.labels,
        })
    }
}
