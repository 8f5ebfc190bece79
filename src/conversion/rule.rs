use super::{ConversionError, ConversionParameters};
use crate::segment::Representation;

/// An operation turning one representation kind into another.
///
/// Rules are the edges of the conversion graph explored by
/// [`SegmentationConverter`](super::SegmentationConverter): each reads
/// representations of [`ConversionRule::source_kind`], writes
/// representations of [`ConversionRule::target_kind`], and declares a cost
/// used to prefer cheaper chains of rules.
pub trait ConversionRule: Send + Sync {
    /// A human-readable name for this rule.
    fn name(&self) -> &str;

    /// The kind name of the representation read by this rule.
    fn source_kind(&self) -> &str;

    /// The kind name of the representation written by this rule.
    fn target_kind(&self) -> &str;

    /// The parameters read by this rule, set to their default values.
    fn default_parameters(&self) -> ConversionParameters {
        ConversionParameters::new()
    }

    /// The relative cost of a conversion, larger for more expensive conversions.
    ///
    /// Both representations are optional: the cost may be queried before
    /// any object exists.
    fn conversion_cost(
        &self,
        source: Option<&Representation>,
        target: Option<&Representation>,
    ) -> u32;

    /// Builds an empty representation for the source or target kind of this rule.
    fn construct_representation_by_kind(&self, kind: &str) -> Option<Representation>;

    /// Builds an empty representation of one of the classes this rule handles.
    fn construct_representation_by_class(&self, class_name: &str) -> Option<Representation>;

    /// Converts `source` and writes the result into `target`.
    ///
    /// On failure, `target` is left unmodified.
    fn convert(
        &self,
        source: &Representation,
        target: &mut Representation,
        parameters: &ConversionParameters,
    ) -> Result<(), ConversionError>;
}
