use crate::math::Vector;

/// An inclusive box of integer voxel indices.
///
/// An axis with `mins[a] > maxs[a]` contains no voxel, and the whole extent is
/// then empty. The canonical empty extent is `[0, -1]` on every axis.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageExtent {
    /// The smallest voxel index on each axis.
    pub mins: Vector<i32>,
    /// The largest voxel index on each axis (inclusive).
    pub maxs: Vector<i32>,
}

impl ImageExtent {
    /// Creates a new extent from its inclusive index bounds.
    #[inline]
    pub fn new(mins: Vector<i32>, maxs: Vector<i32>) -> Self {
        Self { mins, maxs }
    }

    /// An extent containing no voxel.
    #[inline]
    pub fn empty() -> Self {
        Self::new(Vector::zeros(), Vector::repeat(-1))
    }

    /// Builds an extent from the VTK ordering `[imin, imax, jmin, jmax, kmin, kmax]`.
    #[inline]
    pub fn from_array(e: [i32; 6]) -> Self {
        Self::new(Vector::new(e[0], e[2], e[4]), Vector::new(e[1], e[3], e[5]))
    }

    /// This extent in the VTK ordering `[imin, imax, jmin, jmax, kmin, kmax]`.
    #[inline]
    pub fn as_array(&self) -> [i32; 6] {
        [
            self.mins.x,
            self.maxs.x,
            self.mins.y,
            self.maxs.y,
            self.mins.z,
            self.maxs.z,
        ]
    }

    /// Is this extent devoid of voxels?
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|a| self.mins[a] > self.maxs[a])
    }

    /// The number of voxels along each axis.
    ///
    /// All three dimensions are zero if the extent is empty.
    pub fn dimensions(&self) -> Vector<usize> {
        if self.is_empty() {
            return Vector::zeros();
        }

        (self.maxs - self.mins).map(|d| d as usize + 1)
    }

    /// The total number of voxels of this extent, `None` if it does not fit a `usize`.
    pub fn checked_num_voxels(&self) -> Option<usize> {
        self.dimensions()
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d))
    }

    /// The total number of voxels of this extent, saturating at `usize::MAX`.
    ///
    /// Geometries built through [`ImageGeometry`](super::ImageGeometry)
    /// constructors never saturate.
    #[inline]
    pub fn num_voxels(&self) -> usize {
        self.checked_num_voxels().unwrap_or(usize::MAX)
    }

    /// Does this extent contain the voxel `(i, j, k)`?
    #[inline]
    pub fn contains(&self, i: i32, j: i32, k: i32) -> bool {
        let ijk = [i, j, k];
        (0..3).all(|a| ijk[a] >= self.mins[a] && ijk[a] <= self.maxs[a])
    }

    /// Does this extent contain every voxel of `other`?
    ///
    /// An empty `other` is contained by anything.
    pub fn contains_extent(&self, other: &ImageExtent) -> bool {
        other.is_empty()
            || (0..3).all(|a| other.mins[a] >= self.mins[a] && other.maxs[a] <= self.maxs[a])
    }

    /// The index of voxel `(i, j, k)` in an `x`-fastest dense buffer covering this extent.
    pub fn linear_index(&self, i: i32, j: i32, k: i32) -> Option<usize> {
        if !self.contains(i, j, k) {
            return None;
        }

        let dims = self.dimensions();
        let di = (i - self.mins.x) as usize;
        let dj = (j - self.mins.y) as usize;
        let dk = (k - self.mins.z) as usize;
        Some(di + dims.x * (dj + dims.y * dk))
    }

    /// The smallest extent containing both `self` and `other`.
    ///
    /// Empty operands are ignored.
    pub fn merged(&self, other: &ImageExtent) -> ImageExtent {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        ImageExtent::new(self.mins.inf(&other.mins), self.maxs.sup(&other.maxs))
    }

    /// The voxels shared by `self` and `other`, if any.
    pub fn intersection(&self, other: &ImageExtent) -> Option<ImageExtent> {
        let result = ImageExtent::new(self.mins.sup(&other.mins), self.maxs.inf(&other.maxs));

        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }
}

impl Default for ImageExtent {
    fn default() -> Self {
        Self::empty()
    }
}
