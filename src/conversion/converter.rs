use super::{
    ClosedSurfaceToBinaryLabelmapRule, ConversionError, ConversionParameters, ConversionRule,
};
use crate::segment::{Representation, RepresentationFactory, Segment};
use crate::utils::WeightedValue;
use alloc::boxed::Box;
use alloc::collections::BinaryHeap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;
use hashbrown::HashMap;

/// A chain of rules converting a representation kind into another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionPath {
    /// Indices of the rules to apply in order, in [`SegmentationConverter::rules`].
    pub rules: Vec<usize>,
    /// The sum of the costs of the rules.
    pub cost: u64,
}

/// A registry of conversion rules, finding and running the cheapest chain
/// of rules between two representation kinds.
///
/// Rules are the edges of a directed graph whose nodes are representation
/// kinds, weighted by [`ConversionRule::conversion_cost`].
#[derive(Default)]
pub struct SegmentationConverter {
    rules: Vec<Box<dyn ConversionRule>>,
}

impl fmt::Debug for SegmentationConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

impl SegmentationConverter {
    /// A converter without any rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// A converter knowing every built-in rule.
    pub fn with_default_rules() -> Self {
        let mut result = Self::new();
        result.register_rule(Box::new(ClosedSurfaceToBinaryLabelmapRule::new()));
        result
    }

    /// Adds a rule to this converter.
    pub fn register_rule(&mut self, rule: Box<dyn ConversionRule>) {
        self.rules.push(rule);
    }

    /// All the registered rules.
    pub fn rules(&self) -> &[Box<dyn ConversionRule>] {
        &self.rules
    }

    /// The default values of the parameters of every registered rule.
    pub fn default_parameters(&self) -> ConversionParameters {
        let mut result = ConversionParameters::new();

        for rule in &self.rules {
            result.merge_defaults(&rule.default_parameters());
        }

        result
    }

    /// The cheapest chain of rules turning `source_kind` into `target_kind`.
    ///
    /// Converting a kind into itself is the empty path. Returns `None` if no
    /// chain of registered rules connects both kinds.
    pub fn find_cheapest_path(&self, source_kind: &str, target_kind: &str) -> Option<ConversionPath> {
        // kind -> (cost from source, rule reaching it)
        let mut best: HashMap<&str, (u64, Option<usize>)> = HashMap::new();
        let mut queue = BinaryHeap::new();

        let _ = best.insert(source_kind, (0, None));
        queue.push(Reverse(WeightedValue::new(source_kind, 0)));

        while let Some(Reverse(curr)) = queue.pop() {
            if curr.value == target_kind {
                break;
            }

            if best.get(curr.value).is_some_and(|(cost, _)| *cost < curr.cost) {
                // Outdated entry.
                continue;
            }

            for (rule_id, rule) in self.rules.iter().enumerate() {
                if rule.source_kind() != curr.value {
                    continue;
                }

                let cost = curr.cost + rule.conversion_cost(None, None) as u64;
                let next = rule.target_kind();

                if best.get(next).map_or(true, |(known, _)| cost < *known) {
                    let _ = best.insert(next, (cost, Some(rule_id)));
                    queue.push(Reverse(WeightedValue::new(next, cost)));
                }
            }
        }

        let (cost, _) = *best.get(target_kind)?;
        let mut rules = Vec::new();
        let mut curr = target_kind;

        while let Some((_, Some(rule_id))) = best.get(curr) {
            rules.push(*rule_id);
            curr = self.rules[*rule_id].source_kind();
        }

        rules.reverse();
        Some(ConversionPath { rules, cost })
    }

    /// Converts the `source_kind` representation of `segment` into a
    /// `target_kind` representation, stored in the segment.
    ///
    /// Every rule of the cheapest path runs in turn, and the intermediate
    /// representations are stored in the segment as well. Rules read
    /// `parameters`, completed by their defaults. An existing target
    /// representation of the right class is handed to the rule (this is how
    /// [`ClosedSurfaceToBinaryLabelmapRule::with_use_output_geometry`] finds
    /// its output grid). On failure, the segment is left unmodified.
    pub fn convert_segment(
        &self,
        segment: &mut Segment,
        source_kind: &str,
        target_kind: &str,
        parameters: &ConversionParameters,
    ) -> Result<(), ConversionError> {
        let source = segment.representation(source_kind).ok_or_else(|| {
            ConversionError::MissingSourceRepresentation {
                kind: source_kind.to_string(),
            }
        })?;

        let path = self
            .find_cheapest_path(source_kind, target_kind)
            .ok_or_else(|| ConversionError::NoConversionPath {
                source_kind: source_kind.to_string(),
                target_kind: target_kind.to_string(),
            })?;

        log::debug!(
            "Converting {} into {} with {} rule(s), total cost {}.",
            source_kind,
            target_kind,
            path.rules.len(),
            path.cost
        );

        let mut outputs: Vec<(String, Representation)> = Vec::with_capacity(path.rules.len());

        for rule_id in &path.rules {
            let rule = &self.rules[*rule_id];
            let kind = rule.target_kind();
            let input = outputs.last().map_or(source, |(_, repr)| repr);

            let mut output = match segment.representation(kind) {
                Some(existing)
                    if rule
                        .construct_representation_by_class(existing.class_name())
                        .is_some() =>
                {
                    existing.clone()
                }
                _ => rule.construct_representation_by_kind(kind).ok_or_else(|| {
                    ConversionError::RepresentationConstruction {
                        kind: kind.to_string(),
                    }
                })?,
            };

            let mut rule_parameters = parameters.clone();
            rule_parameters.merge_defaults(&rule.default_parameters());
            rule.convert(input, &mut output, &rule_parameters)?;
            outputs.push((kind.to_string(), output));
        }

        for (kind, repr) in outputs {
            let _ = segment.add_representation(kind, repr);
        }

        Ok(())
    }
}

impl RepresentationFactory for SegmentationConverter {
    fn construct_by_kind(&self, kind: &str) -> Option<Representation> {
        self.rules
            .iter()
            .find_map(|rule| rule.construct_representation_by_kind(kind))
    }

    fn construct_by_class(&self, class_name: &str) -> Option<Representation> {
        self.rules
            .iter()
            .find_map(|rule| rule.construct_representation_by_class(class_name))
    }
}
