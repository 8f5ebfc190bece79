//! Axis Aligned Bounding Box.

use crate::math::{HomogeneousMatrix, Point, Real, Vector, DIM};

/// An Axis-Aligned Bounding Box (AABB).
///
/// # Structure
///
/// - **mins**: The point with the smallest coordinates on each axis
/// - **maxs**: The point with the largest coordinates on each axis
///
/// A box with `mins[i] > maxs[i]` on any axis is *invalid*. Invalid boxes are
/// used on purpose: [`Aabb::new_invalid`] is the neutral element of
/// [`Aabb::merge`] and the value reported for things that have no spatial
/// extent at all (an empty segment, an empty mesh). Code inspecting bounds
/// must check [`Aabb::is_valid`] instead of assuming zeros.
///
/// # Example
///
/// ```rust
/// use segmentation3d::bounding_volume::Aabb;
/// use nalgebra::Point3;
///
/// let mut aabb = Aabb::new_invalid();
/// assert!(!aabb.is_valid());
///
/// aabb.take_point(Point3::new(1.0, 2.0, 3.0));
/// aabb.take_point(Point3::new(-1.0, 0.0, 2.0));
///
/// assert_eq!(aabb.mins, Point3::new(-1.0, 0.0, 2.0));
/// assert_eq!(aabb.maxs, Point3::new(1.0, 2.0, 3.0));
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with inverted bounds.
    ///
    /// The resulting AABB has `mins` set to maximum values and `maxs` set to
    /// minimum values. This is the initial value for AABB merging.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new AABB from its center and half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB that tightly encloses a set of points.
    ///
    /// Returns an invalid AABB if the iterator is empty.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point<Real>>,
    {
        let mut result = Self::new_invalid();

        for pt in pts {
            result.take_point(*pt);
        }

        result
    }

    /// Does this AABB have `mins <= maxs` on every axis?
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..DIM).all(|i| self.mins[i] <= self.maxs[i])
    }

    /// Are all the coordinates of this AABB finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.mins.iter().chain(self.maxs.iter()).all(|e| e.is_finite())
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The volume of this AABB, zero if it is invalid.
    #[inline]
    pub fn volume(&self) -> Real {
        if !self.is_valid() {
            return 0.0;
        }

        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Merges this AABB with another one.
    ///
    /// Merging with an invalid AABB leaves `self` unchanged.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    /// The smallest AABB containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// Enlarges this AABB on each side by `amount`.
    #[inline]
    pub fn loosened(&self, amount: Real) -> Aabb {
        Aabb {
            mins: self.mins - Vector::repeat(amount),
            maxs: self.maxs + Vector::repeat(amount),
        }
    }

    /// Tests if the given point is inside of this AABB (boundary included).
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Tests if `other` is completely inside of this AABB.
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        (0..DIM).all(|i| self.mins[i] <= other.mins[i] && self.maxs[i] >= other.maxs[i])
    }

    /// Computes the intersection of this `Aabb` and another one.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let result = Aabb {
            mins: Point::from(self.mins.coords.sup(&other.mins.coords)),
            maxs: Point::from(self.maxs.coords.inf(&other.maxs.coords)),
        };

        for i in 0..DIM {
            if result.mins[i] > result.maxs[i] {
                return None;
            }
        }

        Some(result)
    }

    /// Computes the AABB of this box after an affine transformation.
    ///
    /// All eight corners are transformed so the result stays conservative
    /// under rotations and anisotropic scaling. If any transformed corner has
    /// a NaN coordinate (e.g. `0 * inf`), the result is NaN everywhere, hence
    /// neither valid nor finite.
    pub fn transformed_by(&self, m: &HomogeneousMatrix<Real>) -> Aabb {
        if !self.is_valid() {
            return *self;
        }

        let mut result = Aabb::new_invalid();

        for vtx in self.vertices() {
            let pt = m.transform_point(&vtx);

            if pt.iter().any(|e| e.is_nan()) {
                let nan = Point::from(Vector::repeat(Real::NAN));
                return Aabb::new(nan, nan);
            }

            result.take_point(pt);
        }

        result
    }

    /// Computes the vertices of this `Aabb`.
    ///
    /// The vertices are given in the following order, in a right-handed coordinate system:
    /// ```text
    ///    y             3 - 2
    ///    |           7 − 6 |
    ///    ___ x       |   | 1  (the zero is below 3 and on the left of 1,
    ///   /            4 - 5     hidden by the 4-5-6-7 face.)
    ///  z
    /// ```
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 8] {
        [
            Point::new(self.mins.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.maxs.y, self.maxs.z),
            Point::new(self.mins.x, self.maxs.y, self.maxs.z),
        ]
    }

    /// The bounds in VTK order: `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    #[inline]
    pub fn as_bounds(&self) -> [Real; 6] {
        [
            self.mins.x,
            self.maxs.x,
            self.mins.y,
            self.maxs.y,
            self.mins.z,
            self.maxs.z,
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new_invalid()
    }
}
