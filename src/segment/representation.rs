use crate::bounding_volume::Aabb;
use crate::shape::{LabelVolume, SurfaceMesh};

/// One of the geometric encodings of a segment.
///
/// Each variant is stored in a [`Segment`](super::Segment) under a kind
/// name ([`Representation::CLOSED_SURFACE`], [`Representation::BINARY_LABELMAP`])
/// and can be built by name through a
/// [`RepresentationFactory`](super::RepresentationFactory).
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Representation {
    /// A triangulated closed surface.
    ClosedSurface(SurfaceMesh),
    /// A dense volume of voxel labels.
    BinaryLabelmap(LabelVolume),
}

impl Representation {
    /// The kind name of closed-surface representations.
    pub const CLOSED_SURFACE: &'static str = "Closed surface";
    /// The kind name of binary-labelmap representations.
    pub const BINARY_LABELMAP: &'static str = "Binary labelmap";
    /// The class identifier of [`SurfaceMesh`] objects.
    pub const SURFACE_MESH_CLASS: &'static str = "SurfaceMesh";
    /// The class identifier of [`LabelVolume`] objects.
    pub const LABEL_VOLUME_CLASS: &'static str = "LabelVolume";

    /// An empty closed surface.
    pub fn empty_closed_surface() -> Self {
        Representation::ClosedSurface(SurfaceMesh::empty())
    }

    /// An empty binary labelmap.
    pub fn empty_binary_labelmap() -> Self {
        Representation::BinaryLabelmap(LabelVolume::default())
    }

    /// The kind name this representation is usually stored under.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Representation::ClosedSurface(_) => Self::CLOSED_SURFACE,
            Representation::BinaryLabelmap(_) => Self::BINARY_LABELMAP,
        }
    }

    /// The class identifier of the underlying object.
    pub fn class_name(&self) -> &'static str {
        match self {
            Representation::ClosedSurface(_) => Self::SURFACE_MESH_CLASS,
            Representation::BinaryLabelmap(_) => Self::LABEL_VOLUME_CLASS,
        }
    }

    /// The world-space bounds of this representation, `None` if it is empty.
    pub fn aabb(&self) -> Option<Aabb> {
        match self {
            Representation::ClosedSurface(mesh) => mesh.aabb(),
            Representation::BinaryLabelmap(volume) => volume.aabb(),
        }
    }

    /// Does this representation hold no geometry at all?
    pub fn is_empty(&self) -> bool {
        match self {
            Representation::ClosedSurface(mesh) => mesh.is_empty(),
            Representation::BinaryLabelmap(volume) => volume.is_empty(),
        }
    }

    /// Overwrites the content of `self` with a copy of `other`.
    ///
    /// Returns `false`, leaving `self` unchanged, if both objects are not of
    /// the same class.
    pub fn deep_copy_from(&mut self, other: &Representation) -> bool {
        match (self, other) {
            (Representation::ClosedSurface(dst), Representation::ClosedSurface(src)) => {
                dst.clone_from(src);
                true
            }
            (Representation::BinaryLabelmap(dst), Representation::BinaryLabelmap(src)) => {
                dst.clone_from(src);
                true
            }
            _ => false,
        }
    }

    /// The surface mesh, if this is a closed surface.
    pub fn as_closed_surface(&self) -> Option<&SurfaceMesh> {
        match self {
            Representation::ClosedSurface(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// The mutable surface mesh, if this is a closed surface.
    pub fn as_closed_surface_mut(&mut self) -> Option<&mut SurfaceMesh> {
        match self {
            Representation::ClosedSurface(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// The label volume, if this is a binary labelmap.
    pub fn as_binary_labelmap(&self) -> Option<&LabelVolume> {
        match self {
            Representation::BinaryLabelmap(volume) => Some(volume),
            _ => None,
        }
    }

    /// The mutable label volume, if this is a binary labelmap.
    pub fn as_binary_labelmap_mut(&mut self) -> Option<&mut LabelVolume> {
        match self {
            Representation::BinaryLabelmap(volume) => Some(volume),
            _ => None,
        }
    }
}

impl From<SurfaceMesh> for Representation {
    fn from(mesh: SurfaceMesh) -> Self {
        Representation::ClosedSurface(mesh)
    }
}

impl From<LabelVolume> for Representation {
    fn from(volume: LabelVolume) -> Self {
        Representation::BinaryLabelmap(volume)
    }
}
