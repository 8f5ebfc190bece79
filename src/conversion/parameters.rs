use crate::geometry::ImageGeometry;
use crate::math::Real;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Name of the parameter holding the oversampling factor, or [`AUTOMATIC_OVERSAMPLING`].
pub const OVERSAMPLING_FACTOR_PARAMETER: &str = "Oversampling factor";
/// Name of the boolean parameter enabling the crop of the output to the reference geometry.
pub const CROP_TO_REFERENCE_PARAMETER: &str = "Crop to reference image geometry";
/// Name of the parameter holding the reference geometry, as a geometry string.
pub const REFERENCE_GEOMETRY_PARAMETER: &str = "Reference image geometry";
/// The oversampling factor value requesting an automatically computed factor.
pub const AUTOMATIC_OVERSAMPLING: &str = "A";

/// A string-encoded conversion parameter value, with its description.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionParameter {
    /// The value, encoded as a string.
    pub value: String,
    /// What this parameter does.
    pub description: String,
}

/// How the reference grid is refined before rasterization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Oversampling {
    /// The spacing is divided by this factor on every axis.
    Factor(Real),
    /// A factor derived from the size of the surface relative to the voxel size.
    Automatic,
}

impl Default for Oversampling {
    fn default() -> Self {
        Oversampling::Factor(1.0)
    }
}

/// The named options of a conversion.
///
/// Each rule documents the names it reads; other names are ignored. Missing
/// or malformed values fall back to the defaults of the rule.
///
/// # Example
///
/// ```
/// use segmentation3d::conversion::{ConversionParameters, Oversampling};
///
/// let mut params = ConversionParameters::new();
/// params.set("Oversampling factor", "A");
/// params.set("Crop to reference image geometry", "true");
///
/// assert_eq!(params.oversampling(), Oversampling::Automatic);
/// assert!(params.crop_to_reference());
/// assert!(params.reference_geometry().is_none());
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionParameters {
    params: BTreeMap<String, ConversionParameter>,
}

impl ConversionParameters {
    /// An empty set of parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of the parameter `name`, keeping its description if it had one.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.params.entry(name.into()).or_default().value = value.to_string();
    }

    /// Sets the value and description of the parameter `name`.
    pub fn set_with_description(
        &mut self,
        name: impl Into<String>,
        value: impl ToString,
        description: impl Into<String>,
    ) {
        let _ = self.params.insert(
            name.into(),
            ConversionParameter {
                value: value.to_string(),
                description: description.into(),
            },
        );
    }

    /// Sets the reference geometry parameter from a geometry.
    pub fn set_reference_geometry(&mut self, geometry: &ImageGeometry) {
        self.set(REFERENCE_GEOMETRY_PARAMETER, geometry);
    }

    /// The raw value of the parameter `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|p| p.value.as_str())
    }

    /// The parameter `name`, with its description.
    pub fn get(&self, name: &str) -> Option<&ConversionParameter> {
        self.params.get(name)
    }

    /// Is the parameter `name` set?
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Removes the parameter `name`.
    pub fn remove(&mut self, name: &str) -> Option<ConversionParameter> {
        self.params.remove(name)
    }

    /// Iterates through all the parameters, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConversionParameter)> + '_ {
        self.params.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// The number of parameters set.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Is no parameter set?
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Adds the parameters of `defaults` that are not already set.
    pub fn merge_defaults(&mut self, defaults: &ConversionParameters) {
        for (name, param) in &defaults.params {
            if !self.params.contains_key(name) {
                let _ = self.params.insert(name.clone(), param.clone());
            }
        }
    }

    /// The oversampling requested by [`OVERSAMPLING_FACTOR_PARAMETER`].
    ///
    /// Defaults to a factor of one. Factors that are not strictly positive
    /// finite numbers are malformed.
    pub fn oversampling(&self) -> Oversampling {
        let Some(value) = self.value(OVERSAMPLING_FACTOR_PARAMETER) else {
            return Oversampling::default();
        };
        let value = value.trim();

        if value.eq_ignore_ascii_case(AUTOMATIC_OVERSAMPLING) {
            return Oversampling::Automatic;
        }

        match value.parse::<Real>() {
            Ok(factor) if factor.is_finite() && factor > 0.0 => Oversampling::Factor(factor),
            _ => {
                log::debug!(
                    "Malformed oversampling factor `{}`, no oversampling is applied.",
                    value
                );
                Oversampling::default()
            }
        }
    }

    /// Whether [`CROP_TO_REFERENCE_PARAMETER`] is set to a true value.
    ///
    /// `1`, `true`, `yes` and `on` are true; `0`, `false`, `no`, `off` and the
    /// empty string are false. Anything else is malformed and reads as false.
    pub fn crop_to_reference(&self) -> bool {
        let Some(value) = self.value(CROP_TO_REFERENCE_PARAMETER) else {
            return false;
        };
        let value = value.trim();

        if ["1", "true", "yes", "on"]
            .iter()
            .any(|v| value.eq_ignore_ascii_case(v))
        {
            true
        } else {
            if !["", "0", "false", "no", "off"]
                .iter()
                .any(|v| value.eq_ignore_ascii_case(v))
            {
                log::debug!("Malformed crop flag `{}`, cropping is disabled.", value);
            }

            false
        }
    }

    /// The geometry given by [`REFERENCE_GEOMETRY_PARAMETER`].
    ///
    /// An empty value (or a lone `;`) means no reference geometry.
    pub fn reference_geometry(&self) -> Option<ImageGeometry> {
        let value = self.value(REFERENCE_GEOMETRY_PARAMETER)?.trim();

        if value.is_empty() || value == ";" {
            return None;
        }

        match value.parse::<ImageGeometry>() {
            Ok(geometry) => Some(geometry),
            Err(err) => {
                log::debug!("Ignoring malformed reference geometry: {}", err);
                None
            }
        }
    }
}
