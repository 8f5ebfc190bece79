use super::{Representation, RepresentationFactory};
use crate::bounding_volume::Aabb;
use crate::math::Real;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// The color of a segment whose color was never chosen.
pub const SEGMENT_COLOR_INVALID: [Real; 3] = [0.5, 0.5, 0.5];

/// The tag holding the terminology classification of a segment.
pub const TERMINOLOGY_ENTRY_TAG_NAME: &str = "TerminologyEntry";

/// The terminology classification given to new segments: generic tissue.
pub const DEFAULT_TERMINOLOGY_ENTRY: &str = "Segmentation category and type - 3D Slicer General Anatomy list~SRT^T-D0050^Tissue~SRT^T-D0050^Tissue~^^~Anatomic codes - DICOM master list~^^~^^";

/// Errors raised by segment-level operations.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SegmentError {
    /// Some representations could not be instantiated during a deep copy.
    ///
    /// Every other part of the copy completed; the listed kinds are absent
    /// from the destination.
    #[error("no representation object could be constructed for the kinds {kinds:?}; they were not copied.")]
    MissingRepresentationClass {
        /// The kinds that were skipped.
        kinds: Vec<String>,
    },
}

/// An anatomical region with all its representations and metadata.
///
/// A segment exclusively owns its representations, at most one per kind
/// name. Callers wanting an independent snapshot of a representation clone
/// it out explicitly.
///
/// # Example
///
/// ```
/// use segmentation3d::bounding_volume::Aabb;
/// use segmentation3d::math::Point;
/// use segmentation3d::segment::{Representation, Segment, TERMINOLOGY_ENTRY_TAG_NAME};
/// use segmentation3d::shape::SurfaceMesh;
///
/// let mut segment = Segment::with_name("liver");
/// assert!(segment.has_tag(TERMINOLOGY_ENTRY_TAG_NAME));
///
/// let cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(1.0, 2.0, 3.0)));
/// assert!(segment.add_representation(Representation::CLOSED_SURFACE, cube.into()));
/// assert_eq!(segment.aabb().maxs, Point::new(1.0, 2.0, 3.0));
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct Segment {
    name: Option<String>,
    name_auto_generated: bool,
    color: [Real; 3],
    color_auto_generated: bool,
    representations: BTreeMap<String, Representation>,
    tags: BTreeMap<String, String>,
    modified_count: u64,
}

impl Default for Segment {
    fn default() -> Self {
        Self::new()
    }
}

impl Segment {
    /// A segment without representations, carrying the default terminology tag.
    pub fn new() -> Self {
        let mut tags = BTreeMap::new();
        let _ = tags.insert(
            TERMINOLOGY_ENTRY_TAG_NAME.to_string(),
            DEFAULT_TERMINOLOGY_ENTRY.to_string(),
        );

        Self {
            name: None,
            name_auto_generated: true,
            color: SEGMENT_COLOR_INVALID,
            color_auto_generated: true,
            representations: BTreeMap::new(),
            tags,
            modified_count: 0,
        }
    }

    /// A new segment with a user-chosen name.
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.name = Some(name.into());
        result.name_auto_generated = false;
        result
    }

    /// Counter incremented by every effective change of this segment.
    #[inline]
    pub fn modified_count(&self) -> u64 {
        self.modified_count
    }

    #[inline]
    fn modified(&mut self) {
        self.modified_count += 1;
    }

    /// The display name of this segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the display name of this segment.
    pub fn set_name(&mut self, name: Option<String>) {
        if self.name != name {
            self.name = name;
            self.modified();
        }
    }

    /// Was the name generated rather than chosen by a user?
    pub fn name_auto_generated(&self) -> bool {
        self.name_auto_generated
    }

    /// Flags the name as generated or user-chosen.
    pub fn set_name_auto_generated(&mut self, auto_generated: bool) {
        if self.name_auto_generated != auto_generated {
            self.name_auto_generated = auto_generated;
            self.modified();
        }
    }

    /// The RGB display color of this segment, in `[0, 1]`.
    pub fn color(&self) -> [Real; 3] {
        self.color
    }

    /// Sets the RGB display color of this segment.
    pub fn set_color(&mut self, color: [Real; 3]) {
        if self.color != color {
            self.color = color;
            self.modified();
        }
    }

    /// Was the color generated rather than chosen by a user?
    pub fn color_auto_generated(&self) -> bool {
        self.color_auto_generated
    }

    /// Flags the color as generated or user-chosen.
    pub fn set_color_auto_generated(&mut self, auto_generated: bool) {
        if self.color_auto_generated != auto_generated {
            self.color_auto_generated = auto_generated;
            self.modified();
        }
    }

    /*
     * Representations.
     */
    /// The representation stored under `kind`.
    pub fn representation(&self, kind: &str) -> Option<&Representation> {
        self.representations.get(kind)
    }

    /// Mutable access to the representation stored under `kind`.
    ///
    /// The segment is marked as modified whenever the representation exists.
    pub fn representation_mut(&mut self, kind: &str) -> Option<&mut Representation> {
        if self.representations.contains_key(kind) {
            self.modified();
        }

        self.representations.get_mut(kind)
    }

    /// Does this segment have a representation stored under `kind`?
    pub fn has_representation(&self, kind: &str) -> bool {
        self.representations.contains_key(kind)
    }

    /// Stores `representation` under `kind`, replacing any previous one.
    ///
    /// Returns `false`, without marking the segment as modified, if an equal
    /// representation is already stored under that kind.
    pub fn add_representation(
        &mut self,
        kind: impl Into<String>,
        representation: Representation,
    ) -> bool {
        let kind = kind.into();

        if self.representations.get(&kind) == Some(&representation) {
            return false;
        }

        let _ = self.representations.insert(kind, representation);
        self.modified();
        true
    }

    /// Removes and returns the representation stored under `kind`.
    pub fn remove_representation(&mut self, kind: &str) -> Option<Representation> {
        let removed = self.representations.remove(kind);

        if removed.is_some() {
            self.modified();
        }

        removed
    }

    /// Removes every representation, except the one stored under `except` if given.
    pub fn remove_all_representations(&mut self, except: Option<&str>) {
        let len_before = self.representations.len();
        self.representations
            .retain(|kind, _| Some(kind.as_str()) == except);

        if self.representations.len() != len_before {
            self.modified();
        }
    }

    /// The kind names of the stored representations, sorted.
    pub fn representation_kinds(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.representations.keys().map(String::as_str)
    }

    /// Iterates through all the `(kind, representation)` pairs, sorted by kind.
    pub fn representations(&self) -> impl ExactSizeIterator<Item = (&str, &Representation)> + '_ {
        self.representations
            .iter()
            .map(|(kind, repr)| (kind.as_str(), repr))
    }

    /// The union of the bounds of every non-empty representation.
    ///
    /// This is an invalid AABB (see [`Aabb::new_invalid`]) if no
    /// representation has spatial bounds.
    pub fn aabb(&self) -> Aabb {
        let mut result = Aabb::new_invalid();

        for aabb in self.representations.values().filter_map(Representation::aabb) {
            result.merge(&aabb);
        }

        result
    }

    /*
     * Tags.
     */
    /// Sets the tag `key` to `value`. Nothing happens if the value is unchanged.
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();

        if self.tags.get(&key) == Some(&value) {
            return;
        }

        let _ = self.tags.insert(key, value);
        self.modified();
    }

    /// The value of the tag `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Is the tag `key` set?
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Removes and returns the tag `key`.
    pub fn remove_tag(&mut self, key: &str) -> Option<String> {
        let removed = self.tags.remove(key);

        if removed.is_some() {
            self.modified();
        }

        removed
    }

    /// All the tags of this segment.
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /*
     * Copy.
     */
    /// Copies the name, color, generation flags and tags of `source`.
    pub fn deep_copy_metadata_from(&mut self, source: &Segment) {
        self.name.clone_from(&source.name);
        self.name_auto_generated = source.name_auto_generated;
        self.color = source.color;
        self.color_auto_generated = source.color_auto_generated;
        self.tags.clone_from(&source.tags);
        self.modified();
    }

    /// Makes `self` an independent mirror of `source`.
    ///
    /// Metadata is copied by value. Every representation of `source` is
    /// copied into a new object of the same class built by `factory`, which
    /// replaces whatever `self` stored under that kind. Kinds absent from
    /// `source` are then removed from `self`.
    ///
    /// If `factory` cannot build some class, that kind is skipped and ends up
    /// absent from `self`; the rest of the copy still happens and the skipped
    /// kinds are reported by the returned error.
    pub fn deep_copy_from(
        &mut self,
        source: &Segment,
        factory: &dyn RepresentationFactory,
    ) -> Result<(), SegmentError> {
        self.deep_copy_metadata_from(source);

        let mut copied = BTreeSet::new();
        let mut missing = Vec::new();

        for (kind, src) in &source.representations {
            let built = factory
                .construct_by_class(src.class_name())
                .and_then(|mut dst| dst.deep_copy_from(src).then_some(dst));

            match built {
                Some(dst) => {
                    let _ = self.representations.insert(kind.clone(), dst);
                    let _ = copied.insert(kind.as_str());
                }
                None => {
                    log::error!(
                        "Cannot construct a representation of class {} for the kind {}; it is not copied.",
                        src.class_name(),
                        kind
                    );
                    missing.push(kind.clone());
                }
            }
        }

        self.representations
            .retain(|kind, _| copied.contains(kind.as_str()));

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SegmentError::MissingRepresentationClass { kinds: missing })
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name.as_deref().unwrap_or("(none)"))?;
        writeln!(
            f,
            "Color: ({}, {}, {})",
            self.color[0], self.color[1], self.color[2]
        )?;

        writeln!(f, "Representations:")?;
        for (kind, repr) in &self.representations {
            writeln!(f, "  {} {}", kind, repr.class_name())?;

            match repr {
                Representation::ClosedSurface(mesh) => {
                    writeln!(f, "    Number of points: {}", mesh.vertices().len())?;
                    writeln!(f, "    Number of cells: {}", mesh.num_triangles())?;
                }
                Representation::BinaryLabelmap(volume) => {
                    let geometry = volume.geometry();
                    writeln!(f, "    Extent: {:?}", geometry.extent().as_array())?;
                    writeln!(f, "    Origin: {:?}", geometry.origin().coords.as_slice())?;
                    writeln!(f, "    Spacing: {:?}", geometry.spacing().as_slice())?;
                }
            }
        }

        writeln!(f, "Tags:")?;
        for (key, value) in &self.tags {
            writeln!(f, "  {}: {}", key, value)?;
        }

        Ok(())
    }
}
