use super::{GeometryError, ImageExtent};
use crate::bounding_volume::Aabb;
use crate::math::{HomogeneousMatrix, Matrix, Point, Real, Vector};
use approx::{AbsDiffEq, RelativeEq};
#[cfg(not(feature = "std"))]
use na::ComplexField;

/// Index-space values closer than this to an integer are snapped to it
/// before rounding, so that round-off does not add a spurious voxel layer.
const INDEX_ROUNDING_TOLERANCE: Real = 1.0e-6;

/// The geometry of an oriented voxel grid.
///
/// A voxel of integer index `ijk` has its center at
/// `origin + directions * (spacing ∘ ijk)` where `∘` is the component-wise
/// product. The spacing is strictly positive on every axis and the direction
/// matrix is invertible (orthonormal in practice); both are checked by every
/// constructor so an `ImageGeometry` can always map points back and forth.
///
/// # Example
///
/// ```
/// use segmentation3d::geometry::{ImageExtent, ImageGeometry};
/// use segmentation3d::math::{Point, Vector};
///
/// let geometry = ImageGeometry::identity(
///     Point::new(10.0, 0.0, 0.0),
///     Vector::new(0.5, 0.5, 2.0),
///     ImageExtent::from_array([0, 9, 0, 9, 0, 4]),
/// )
/// .unwrap();
///
/// assert_eq!(geometry.index_to_world(&Point::new(2.0, 4.0, 1.0)), Point::new(11.0, 2.0, 2.0));
/// assert!(geometry.contains_point(&Point::new(12.0, 1.0, 3.0)));
///
/// // The canonical string form round-trips.
/// let restored: ImageGeometry = geometry.to_string().parse().unwrap();
/// assert_eq!(restored.extent(), geometry.extent());
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-serialize",
    serde(try_from = "ImageGeometryFields", into = "ImageGeometryFields")
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageGeometry {
    origin: Point<Real>,
    spacing: Vector<Real>,
    directions: Matrix<Real>,
    extent: ImageExtent,
    world_to_image: HomogeneousMatrix<Real>,
}

impl ImageGeometry {
    /// Creates a new grid geometry after checking its invariants.
    ///
    /// The columns of `directions` are the world-space directions of the
    /// `i`, `j` and `k` axes.
    pub fn new(
        origin: Point<Real>,
        spacing: Vector<Real>,
        directions: Matrix<Real>,
        extent: ImageExtent,
    ) -> Result<Self, GeometryError> {
        if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GeometryError::InvalidSpacing(spacing.into()));
        }

        if origin.iter().any(|e| !e.is_finite()) {
            return Err(GeometryError::NonFiniteOrigin(origin.coords.into()));
        }

        if directions.iter().any(|e| !e.is_finite()) {
            return Err(GeometryError::InvalidDirections);
        }

        let inv_directions = directions
            .try_inverse()
            .ok_or(GeometryError::InvalidDirections)?;

        // world -> index: diag(1 / spacing) * directions^-1 * (p - origin)
        let linear = Matrix::from_diagonal(&spacing.map(|s| 1.0 / s)) * inv_directions;
        let translation = -(linear * origin.coords);
        let mut world_to_image = linear.to_homogeneous();
        world_to_image
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&translation);

        if world_to_image.iter().any(|e| !e.is_finite()) {
            return Err(GeometryError::InvalidDirections);
        }

        check_num_voxels(&extent)?;

        Ok(Self {
            origin,
            spacing,
            directions,
            extent,
            world_to_image,
        })
    }

    /// Creates an axis-aligned grid geometry (identity direction matrix).
    pub fn identity(
        origin: Point<Real>,
        spacing: Vector<Real>,
        extent: ImageExtent,
    ) -> Result<Self, GeometryError> {
        Self::new(origin, spacing, Matrix::identity(), extent)
    }

    /// Decomposes an image-to-world matrix into origin, spacing and directions.
    ///
    /// The spacing is the norm of each of the three first columns, the
    /// directions are these columns normalized, and the origin is the
    /// translation part.
    pub fn from_image_to_world(
        image_to_world: &HomogeneousMatrix<Real>,
        extent: ImageExtent,
    ) -> Result<Self, GeometryError> {
        let scaled_directions: Matrix<Real> = image_to_world.fixed_view::<3, 3>(0, 0).into_owned();
        let spacing = Vector::from_fn(|a, _| scaled_directions.column(a).norm());

        if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GeometryError::InvalidSpacing(spacing.into()));
        }

        let mut directions = scaled_directions;
        for a in 0..3 {
            directions.column_mut(a).unscale_mut(spacing[a]);
        }

        let origin = Point::from(image_to_world.fixed_view::<3, 1>(0, 3).into_owned());
        Self::new(origin, spacing, directions, extent)
    }

    /// The default geometry used to sample a region of space.
    ///
    /// It has an identity direction matrix, a unit spacing, its origin at
    /// `bounds.mins`, and an extent whose voxel centers cover `bounds` exactly.
    /// An invalid (empty) `bounds` yields an empty extent located at the world origin.
    pub fn from_bounds(bounds: &Aabb) -> Result<Self, GeometryError> {
        if !bounds.is_valid() {
            return Ok(Self::default());
        }

        if !bounds.is_finite() {
            return Err(GeometryError::NonFiniteBounds);
        }

        let extents = bounds.extents();
        let mut maxs = Vector::zeros();

        for a in 0..3 {
            maxs[a] = index_ceil(extents[a])?;
        }

        Self::identity(
            bounds.mins,
            Vector::repeat(1.0),
            ImageExtent::new(Vector::zeros(), maxs),
        )
    }

    /// The world-space position of the center of voxel `(0, 0, 0)`.
    #[inline]
    pub fn origin(&self) -> Point<Real> {
        self.origin
    }

    /// The distance between adjacent voxel centers along each axis.
    #[inline]
    pub fn spacing(&self) -> Vector<Real> {
        self.spacing
    }

    /// The world-space directions of the voxel axes, as matrix columns.
    #[inline]
    pub fn directions(&self) -> &Matrix<Real> {
        &self.directions
    }

    /// The voxel index box sampled by this geometry.
    #[inline]
    pub fn extent(&self) -> ImageExtent {
        self.extent
    }

    /// Replaces the extent of this geometry. The mapping to world space is unchanged.
    #[inline]
    pub fn set_extent(&mut self, extent: ImageExtent) {
        self.extent = extent;
    }

    /// A copy of this geometry with a different extent.
    #[inline]
    #[must_use]
    pub fn with_extent(mut self, extent: ImageExtent) -> Self {
        self.extent = extent;
        self
    }

    /// The number of voxels along each axis.
    #[inline]
    pub fn dimensions(&self) -> Vector<usize> {
        self.extent.dimensions()
    }

    /// The homogeneous matrix mapping continuous voxel indices to world coordinates.
    pub fn image_to_world(&self) -> HomogeneousMatrix<Real> {
        let linear = self.directions * Matrix::from_diagonal(&self.spacing);
        let mut result = linear.to_homogeneous();
        result
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&self.origin.coords);
        result
    }

    /// The homogeneous matrix mapping world coordinates to continuous voxel indices.
    #[inline]
    pub fn world_to_image(&self) -> &HomogeneousMatrix<Real> {
        &self.world_to_image
    }

    /// Maps a continuous voxel index to world coordinates.
    #[inline]
    pub fn index_to_world(&self, ijk: &Point<Real>) -> Point<Real> {
        self.origin + self.directions * ijk.coords.component_mul(&self.spacing)
    }

    /// Maps a world-space point to continuous voxel-index coordinates.
    #[inline]
    pub fn world_to_index(&self, pt: &Point<Real>) -> Point<Real> {
        self.world_to_image.transform_point(pt)
    }

    /// The world-space center of voxel `(i, j, k)`.
    #[inline]
    pub fn voxel_center(&self, i: i32, j: i32, k: i32) -> Point<Real> {
        self.index_to_world(&Point::new(i as Real, j as Real, k as Real))
    }

    /// The world-space bounds of the voxel centers of this grid.
    ///
    /// This is an invalid AABB if the extent is empty.
    pub fn aabb(&self) -> Aabb {
        self.index_aabb(0.0)
    }

    /// The world-space bounds of the voxel cells (centers padded by half a voxel).
    pub fn cell_aabb(&self) -> Aabb {
        self.index_aabb(0.5)
    }

    fn index_aabb(&self, padding: Real) -> Aabb {
        if self.extent.is_empty() {
            return Aabb::new_invalid();
        }

        let index_box = Aabb::new(
            Point::from(self.extent.mins.cast::<Real>()),
            Point::from(self.extent.maxs.cast::<Real>()),
        )
        .loosened(padding);
        index_box.transformed_by(&self.image_to_world())
    }

    /// Does `pt` lie inside one of the voxel cells of this grid?
    pub fn contains_point(&self, pt: &Point<Real>) -> bool {
        if self.extent.is_empty() {
            return false;
        }

        let ijk = self.world_to_index(pt);
        (0..3).all(|a| {
            ijk[a] >= self.extent.mins[a] as Real - 0.5
                && ijk[a] <= self.extent.maxs[a] as Real + 0.5
        })
    }

    /// Refines this geometry by `factor` while keeping its physical coverage.
    ///
    /// The spacing is divided by `factor` and the number of voxels along each
    /// axis becomes `ceil(factor * dim)`. The origin moves so that the outer
    /// corner of the first voxel cell stays in place. A factor below one
    /// coarsens the grid.
    pub fn with_oversampling(&self, factor: Real) -> Result<Self, GeometryError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(GeometryError::InvalidOversamplingFactor(factor));
        }

        let new_spacing = self.spacing / factor;

        if self.extent.is_empty() {
            return Self::new(self.origin, new_spacing, self.directions, self.extent);
        }

        let dims = self.extent.dimensions();
        let mut mins = Vector::zeros();
        let mut maxs = Vector::zeros();
        let mut shift = Vector::zeros();

        for a in 0..3 {
            mins[a] = index_ceil(factor * self.extent.mins[a] as Real)?;
            let dim = index_ceil(factor * dims[a] as Real)?.max(1);
            maxs[a] = mins[a] + dim - 1;

            let old_corner = (self.extent.mins[a] as Real - 0.5) * self.spacing[a];
            let new_corner = (mins[a] as Real - 0.5) * new_spacing[a];
            shift[a] = old_corner - new_corner;
        }

        Self::new(
            self.origin + self.directions * shift,
            new_spacing,
            self.directions,
            ImageExtent::new(mins, maxs),
        )
    }

    /// Grows the extent of this geometry outward until its voxel centers
    /// cover `bounds`.
    ///
    /// Origin, spacing and directions are left untouched, and the extent never
    /// shrinks. An invalid `bounds` leaves the geometry unchanged.
    pub fn encompassing(&self, bounds: &Aabb) -> Result<Self, GeometryError> {
        if !bounds.is_valid() {
            return Ok(*self);
        }

        if !bounds.is_finite() {
            return Err(GeometryError::NonFiniteBounds);
        }

        let index_bounds = bounds.transformed_by(&self.world_to_image);

        if !index_bounds.is_finite() {
            return Err(GeometryError::NonFiniteBounds);
        }

        let mut mins = Vector::zeros();
        let mut maxs = Vector::zeros();

        for a in 0..3 {
            mins[a] = index_floor(index_bounds.mins[a])?;
            maxs[a] = index_ceil(index_bounds.maxs[a])?;
        }

        let extent = self.extent.merged(&ImageExtent::new(mins, maxs));

        if extent.is_empty() {
            return Err(GeometryError::InvertedExtent(extent.as_array()));
        }

        check_num_voxels(&extent)?;
        Ok(self.with_extent(extent))
    }

    /// Do `self` and `other` describe the same world-to-index mapping
    /// (ignoring their extents), up to `epsilon`?
    pub fn is_same_lattice(&self, other: &ImageGeometry, epsilon: Real) -> bool {
        relative_eq!(self.origin, other.origin, epsilon = epsilon)
            && relative_eq!(self.spacing, other.spacing, epsilon = epsilon)
            && relative_eq!(self.directions, other.directions, epsilon = epsilon)
    }
}

impl Default for ImageGeometry {
    /// An empty extent at the world origin, with unit spacing and identity directions.
    fn default() -> Self {
        Self {
            origin: Point::origin(),
            spacing: Vector::repeat(1.0),
            directions: Matrix::identity(),
            extent: ImageExtent::empty(),
            world_to_image: HomogeneousMatrix::identity(),
        }
    }
}

impl AbsDiffEq for ImageGeometry {
    type Epsilon = Real;

    fn default_epsilon() -> Real {
        Real::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Real) -> bool {
        self.extent == other.extent
            && self.origin.abs_diff_eq(&other.origin, epsilon)
            && self.spacing.abs_diff_eq(&other.spacing, epsilon)
            && self.directions.abs_diff_eq(&other.directions, epsilon)
    }
}

impl RelativeEq for ImageGeometry {
    fn default_max_relative() -> Real {
        Real::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Real, max_relative: Real) -> bool {
        self.extent == other.extent
            && self.origin.relative_eq(&other.origin, epsilon, max_relative)
            && self
                .spacing
                .relative_eq(&other.spacing, epsilon, max_relative)
            && self
                .directions
                .relative_eq(&other.directions, epsilon, max_relative)
    }
}

/// The serialized form of an [`ImageGeometry`].
///
/// The world-to-image transform is not stored: deserialization goes through
/// [`ImageGeometry::new`], which recomputes it and checks every invariant.
#[cfg(feature = "serde-serialize")]
#[derive(Serialize, Deserialize)]
struct ImageGeometryFields {
    origin: Point<Real>,
    spacing: Vector<Real>,
    directions: Matrix<Real>,
    extent: ImageExtent,
}

#[cfg(feature = "serde-serialize")]
impl From<ImageGeometry> for ImageGeometryFields {
    fn from(geometry: ImageGeometry) -> Self {
        Self {
            origin: geometry.origin,
            spacing: geometry.spacing,
            directions: geometry.directions,
            extent: geometry.extent,
        }
    }
}

#[cfg(feature = "serde-serialize")]
impl TryFrom<ImageGeometryFields> for ImageGeometry {
    type Error = GeometryError;

    fn try_from(fields: ImageGeometryFields) -> Result<Self, GeometryError> {
        Self::new(
            fields.origin,
            fields.spacing,
            fields.directions,
            fields.extent,
        )
    }
}

fn index_floor(x: Real) -> Result<i32, GeometryError> {
    to_index((x + INDEX_ROUNDING_TOLERANCE).floor())
}

fn index_ceil(x: Real) -> Result<i32, GeometryError> {
    to_index((x - INDEX_ROUNDING_TOLERANCE).ceil())
}

fn check_num_voxels(extent: &ImageExtent) -> Result<(), GeometryError> {
    extent
        .checked_num_voxels()
        .map(|_| ())
        .ok_or(GeometryError::TooManyVoxels(extent.as_array()))
}

fn to_index(x: Real) -> Result<i32, GeometryError> {
    // Keep some headroom so extent arithmetic (max - min + 1) cannot overflow.
    let limit = (i32::MAX / 4) as Real;

    if x.is_finite() && x.abs() <= limit {
        Ok(x as i32)
    } else {
        Err(GeometryError::NonFiniteBounds)
    }
}

#[cfg(test)]
mod test {
    use super::ImageGeometry;
    use crate::bounding_volume::Aabb;
    use crate::geometry::{GeometryError, ImageExtent};
    use crate::math::{Matrix, Point, Real, Vector};

    fn rotated_geometry() -> ImageGeometry {
        let rot = na::Rotation3::from_euler_angles(0.3, -0.2, 1.1);
        ImageGeometry::new(
            Point::new(-3.0, 2.5, 7.0),
            Vector::new(0.7, 1.3, 2.0),
            *rot.matrix(),
            ImageExtent::from_array([-2, 5, 0, 3, 1, 4]),
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let err = ImageGeometry::identity(
            Point::origin(),
            Vector::new(1.0, 0.0, 1.0),
            ImageExtent::empty(),
        );
        assert_eq!(err, Err(GeometryError::InvalidSpacing([1.0, 0.0, 1.0])));
        assert!(ImageGeometry::new(
            Point::origin(),
            Vector::repeat(1.0),
            Matrix::zeros(),
            ImageExtent::empty()
        )
        .is_err());
    }

    #[test]
    fn index_world_round_trip() {
        let geometry = rotated_geometry();
        let ijk = Point::new(1.5, -2.0, 3.25);
        let world = geometry.index_to_world(&ijk);
        assert_relative_eq!(geometry.world_to_index(&world), ijk, epsilon = 1.0e-9);
        assert_relative_eq!(
            geometry.image_to_world().transform_point(&ijk),
            world,
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn decompose_image_to_world() {
        let geometry = rotated_geometry();
        let restored =
            ImageGeometry::from_image_to_world(&geometry.image_to_world(), geometry.extent())
                .unwrap();
        assert_relative_eq!(restored, geometry, epsilon = 1.0e-9);
    }

    #[test]
    fn default_geometry_covers_bounds() {
        let bounds = Aabb::new(Point::new(1.0, 2.0, 3.0), Point::new(4.0, 2.5, 3.0));
        let geometry = ImageGeometry::from_bounds(&bounds).unwrap();
        assert_eq!(geometry.origin(), bounds.mins);
        assert_eq!(geometry.spacing(), Vector::repeat(1.0));
        assert_eq!(geometry.extent().as_array(), [0, 3, 0, 1, 0, 0]);
        assert!(geometry.aabb().contains(&bounds));

        let empty = ImageGeometry::from_bounds(&Aabb::new_invalid()).unwrap();
        assert!(empty.extent().is_empty());
        assert!(!empty.aabb().is_valid());
    }

    #[test]
    fn oversampling_keeps_cell_coverage() {
        let geometry = rotated_geometry();

        for factor in [0.5, 1.0, 2.0, 3.0, 4.0] {
            let refined = geometry.with_oversampling(factor).unwrap();
            assert_relative_eq!(refined.spacing(), geometry.spacing() / factor);

            // The first cell corner is pinned.
            let corner = |g: &ImageGeometry| {
                let mins = g.extent().mins.cast::<Real>();
                g.index_to_world(&Point::from(mins - Vector::repeat(0.5)))
            };
            assert_relative_eq!(corner(&refined), corner(&geometry), epsilon = 1.0e-9);

            let dims = geometry.dimensions();
            let refined_dims = refined.dimensions();
            for a in 0..3 {
                assert_eq!(refined_dims[a], (dims[a] as Real * factor).ceil() as usize);
            }
        }

        assert_eq!(geometry.with_oversampling(1.0).unwrap(), geometry);
        assert!(geometry.with_oversampling(0.0).is_err());
        assert!(geometry.with_oversampling(Real::NAN).is_err());
    }

    #[test]
    fn encompassing_only_grows() {
        let geometry = ImageGeometry::identity(
            Point::origin(),
            Vector::repeat(1.0),
            ImageExtent::from_array([0, 4, 0, 4, 0, 4]),
        )
        .unwrap();

        let inside = Aabb::new(Point::new(1.0, 1.0, 1.0), Point::new(2.0, 2.0, 2.0));
        assert_eq!(geometry.encompassing(&inside).unwrap(), geometry);

        let outside = Aabb::new(Point::new(-1.5, 2.0, 3.0), Point::new(2.0, 6.2, 3.0));
        let grown = geometry.encompassing(&outside).unwrap();
        assert_eq!(grown.extent().as_array(), [-2, 4, 0, 7, 0, 4]);
        assert_eq!(grown.origin(), geometry.origin());

        let infinite = Aabb::new(Point::origin(), Point::new(Real::INFINITY, 0.0, 0.0));
        assert_eq!(
            geometry.encompassing(&infinite),
            Err(GeometryError::NonFiniteBounds)
        );
        assert_eq!(
            rotated_geometry().encompassing(&infinite),
            Err(GeometryError::NonFiniteBounds)
        );
    }

    #[test]
    fn voxel_count_overflow_is_rejected() {
        let geometry = ImageGeometry::identity(
            Point::origin(),
            Vector::repeat(1.0),
            ImageExtent::from_array([0, 1, 0, 1, 0, 1]),
        )
        .unwrap();

        // 2e8 voxels per axis fit an `i32` index, but not their product.
        assert!(matches!(
            geometry.with_oversampling(1.0e8),
            Err(GeometryError::TooManyVoxels(_))
        ));

        let huge = ImageExtent::from_array([0, 200_000_000, 0, 200_000_000, 0, 200_000_000]);
        assert_eq!(huge.checked_num_voxels(), None);
        assert!(matches!(
            ImageGeometry::identity(Point::origin(), Vector::repeat(1.0), huge),
            Err(GeometryError::TooManyVoxels(_))
        ));

        let far = Aabb::new(Point::origin(), Point::new(4.0e8, 4.0e8, 4.0e8));
        assert!(matches!(
            geometry.encompassing(&far),
            Err(GeometryError::TooManyVoxels(_))
        ));
    }

    #[cfg(feature = "serde-serialize")]
    #[test]
    fn deserialized_fields_are_validated() {
        use super::ImageGeometryFields;

        let geometry = rotated_geometry();
        let restored = ImageGeometry::try_from(ImageGeometryFields::from(geometry)).unwrap();
        assert_eq!(restored, geometry);

        let mut fields = ImageGeometryFields::from(geometry);
        fields.spacing = Vector::new(1.0, 0.0, 1.0);
        assert!(matches!(
            ImageGeometry::try_from(fields),
            Err(GeometryError::InvalidSpacing(_))
        ));

        let mut fields = ImageGeometryFields::from(geometry);
        fields.directions = Matrix::zeros();
        assert_eq!(
            ImageGeometry::try_from(fields),
            Err(GeometryError::InvalidDirections)
        );

        let mut fields = ImageGeometryFields::from(geometry);
        fields.extent = ImageExtent::from_array([0, 200_000_000, 0, 200_000_000, 0, 200_000_000]);
        assert!(matches!(
            ImageGeometry::try_from(fields),
            Err(GeometryError::TooManyVoxels(_))
        ));
    }

    #[test]
    fn point_containment_uses_cells() {
        let geometry = ImageGeometry::identity(
            Point::origin(),
            Vector::repeat(2.0),
            ImageExtent::from_array([0, 1, 0, 1, 0, 1]),
        )
        .unwrap();
        assert!(geometry.contains_point(&Point::new(-0.9, 0.0, 2.9)));
        assert!(!geometry.contains_point(&Point::new(-1.1, 0.0, 0.0)));
        assert!(!geometry.contains_point(&Point::new(0.0, 3.1, 0.0)));
    }
}
