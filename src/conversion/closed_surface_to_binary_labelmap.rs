use super::oversampling::automatic_oversampling_factor;
use super::parameters::{
    AUTOMATIC_OVERSAMPLING, CROP_TO_REFERENCE_PARAMETER, OVERSAMPLING_FACTOR_PARAMETER,
};
use super::{ConversionError, ConversionParameters, ConversionRule, Oversampling};
use crate::geometry::{ImageExtent, ImageGeometry};
use crate::rasterization;
use crate::segment::{DefaultRepresentationFactory, Representation, RepresentationFactory};
use crate::shape::SurfaceMesh;
use alloc::format;

const CONVERSION_COST: u32 = 500;

/// The grid a surface is rasterized on, and the extent the result is cropped to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LabelmapGeometry {
    /// The grid the surface is rasterized on.
    pub geometry: ImageGeometry,
    /// If set, the rasterized volume is cropped to this extent.
    pub crop_extent: Option<ImageExtent>,
}

/// Rasterizes a closed surface into a binary labelmap.
///
/// Unless told to reuse the geometry of its output, the rule samples the
/// surface on the reference geometry given by the conversion parameters
/// (or, without reference, on a unit-spacing grid fitted to the surface
/// bounds), refined by the oversampling factor and grown until it contains
/// the whole surface.
///
/// Parameters:
/// - `"Oversampling factor"`: a positive number, or `"A"` for an automatic
///   factor (see [`automatic_oversampling_factor`]). Defaults to `1`.
/// - `"Crop to reference image geometry"`: crop the output back to the
///   (oversampled) reference extent. Defaults to false.
/// - `"Reference image geometry"`: the reference grid, as a geometry string.
///
/// Surfaces with boundary edges are rejected with [`ConversionError::OpenSurface`].
#[derive(Copy, Clone, Debug, Default)]
pub struct ClosedSurfaceToBinaryLabelmapRule {
    use_output_geometry: bool,
}

impl ClosedSurfaceToBinaryLabelmapRule {
    /// The name of this rule.
    pub const NAME: &'static str = "Closed surface to binary labelmap (simple image stencil)";

    /// A rule deriving its output geometry from the surface and the parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the geometry of the target labelmap is reused as is.
    ///
    /// This is useful to convert into a precomputed grid, for example to
    /// stitch sub-volumes back together. A target with an empty extent has no
    /// usable geometry and is ignored.
    #[must_use]
    pub fn with_use_output_geometry(mut self, use_output_geometry: bool) -> Self {
        self.use_output_geometry = use_output_geometry;
        self
    }

    /// Sets whether the geometry of the target labelmap is reused as is.
    pub fn set_use_output_geometry(&mut self, use_output_geometry: bool) {
        self.use_output_geometry = use_output_geometry;
    }

    /// Is the geometry of the target labelmap reused as is?
    pub fn use_output_geometry(&self) -> bool {
        self.use_output_geometry
    }

    /// The grid with identity directions and unit spacing whose voxel centers
    /// cover the bounds of `mesh`.
    ///
    /// The extent is empty for an empty mesh.
    pub fn default_geometry(mesh: &SurfaceMesh) -> Result<ImageGeometry, ConversionError> {
        let bounds = mesh.aabb().unwrap_or_default();
        Ok(ImageGeometry::from_bounds(&bounds)?)
    }

    /// Derives the grid `mesh` is rasterized on from the conversion parameters.
    pub fn calculate_output_geometry(
        &self,
        mesh: &SurfaceMesh,
        parameters: &ConversionParameters,
    ) -> Result<LabelmapGeometry, ConversionError> {
        let reference = parameters.reference_geometry();
        let base = match reference {
            Some(reference) => reference,
            None => Self::default_geometry(mesh)?,
        };

        let factor = match parameters.oversampling() {
            Oversampling::Factor(factor) => factor,
            Oversampling::Automatic => automatic_oversampling_factor(mesh, &base.spacing()),
        };

        let oversampled = base.with_oversampling(factor)?;

        let geometry = match mesh.aabb() {
            Some(bounds) => oversampled.encompassing(&bounds)?,
            None => oversampled,
        };

        let crop_extent = if reference.is_some() && parameters.crop_to_reference() {
            Some(oversampled.extent())
        } else {
            None
        };

        log::debug!(
            "Output labelmap geometry: extent {:?}, spacing {:?} (oversampling {}).",
            geometry.extent().as_array(),
            geometry.spacing().as_slice(),
            factor
        );

        Ok(LabelmapGeometry {
            geometry,
            crop_extent,
        })
    }
}

impl ConversionRule for ClosedSurfaceToBinaryLabelmapRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn source_kind(&self) -> &str {
        Representation::CLOSED_SURFACE
    }

    fn target_kind(&self) -> &str {
        Representation::BINARY_LABELMAP
    }

    fn default_parameters(&self) -> ConversionParameters {
        let mut result = ConversionParameters::new();
        result.set_with_description(
            OVERSAMPLING_FACTOR_PARAMETER,
            1,
            format!(
                "Determines the oversampling of the reference image geometry. If it's a number, \
                 then all segments are oversampled with the same value (value of 1 means no \
                 oversampling). If it has the value \"{}\", then automatic oversampling is calculated.",
                AUTOMATIC_OVERSAMPLING
            ),
        );
        result.set_with_description(
            CROP_TO_REFERENCE_PARAMETER,
            0,
            "Crop the model to the extent of the reference geometry. 0 (default) = created \
             labelmap will contain the entire model. 1 = created labelmap extent will be within \
             the reference image extent.",
        );
        result
    }

    fn conversion_cost(
        &self,
        _source: Option<&Representation>,
        _target: Option<&Representation>,
    ) -> u32 {
        CONVERSION_COST
    }

    fn construct_representation_by_kind(&self, kind: &str) -> Option<Representation> {
        match kind {
            Representation::CLOSED_SURFACE | Representation::BINARY_LABELMAP => {
                DefaultRepresentationFactory.construct_by_kind(kind)
            }
            _ => None,
        }
    }

    fn construct_representation_by_class(&self, class_name: &str) -> Option<Representation> {
        match class_name {
            Representation::SURFACE_MESH_CLASS | Representation::LABEL_VOLUME_CLASS => {
                DefaultRepresentationFactory.construct_by_class(class_name)
            }
            _ => None,
        }
    }

    fn convert(
        &self,
        source: &Representation,
        target: &mut Representation,
        parameters: &ConversionParameters,
    ) -> Result<(), ConversionError> {
        let mesh = source
            .as_closed_surface()
            .ok_or(ConversionError::InvalidSource {
                expected: Representation::SURFACE_MESH_CLASS,
                found: source.class_name(),
            })?;
        let found = target.class_name();
        let volume = target
            .as_binary_labelmap_mut()
            .ok_or(ConversionError::InvalidTarget {
                expected: Representation::LABEL_VOLUME_CLASS,
                found,
            })?;

        let boundary_edges = mesh.boundary_edges().len();

        if boundary_edges != 0 {
            log::warn!(
                "Refusing to rasterize a surface with {} boundary edges.",
                boundary_edges
            );
            return Err(ConversionError::OpenSurface { boundary_edges });
        }

        let output = if self.use_output_geometry && !volume.extent().is_empty() {
            LabelmapGeometry {
                geometry: *volume.geometry(),
                crop_extent: None,
            }
        } else {
            if self.use_output_geometry {
                log::warn!("The output labelmap has an empty extent, deriving its geometry instead.");
            }

            self.calculate_output_geometry(mesh, parameters)?
        };

        let mut result = rasterization::rasterize(mesh, &output.geometry);

        if let Some(crop_extent) = output.crop_extent {
            result = result.cropped(&crop_extent);
        }

        *volume = result;
        Ok(())
    }
}
