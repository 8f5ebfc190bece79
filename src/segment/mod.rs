//! Segments and their representations.
//!
//! A [`Segment`] bundles every [`Representation`] of one anatomical region
//! together with its display metadata and free-form tags. Representations
//! are a closed set of variants; a [`RepresentationFactory`] creates empty
//! ones by kind name or class identifier.

pub use self::factory::{DefaultRepresentationFactory, RepresentationFactory};
pub use self::representation::Representation;
pub use self::segment::{
    Segment, SegmentError, DEFAULT_TERMINOLOGY_ENTRY, SEGMENT_COLOR_INVALID,
    TERMINOLOGY_ENTRY_TAG_NAME,
};

mod factory;
mod representation;
mod segment;
