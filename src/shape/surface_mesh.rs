use crate::bounding_volume::Aabb;
use crate::math::{HomogeneousMatrix, Point, Real};
use crate::utils::SortedPair;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::hash_map::{Entry, HashMap};

/// Indicated an inconsistency while building a surface mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceMeshBuilderError {
    /// A triangle references a vertex that does not exist.
    #[error("the triangle {triangle} references the vertex {vertex} but the mesh only has {num_vertices} vertices.")]
    VertexIndexOutOfBounds {
        /// The offending triangle.
        triangle: u32,
        /// The out-of-bounds vertex index.
        vertex: u32,
        /// The number of vertices of the mesh.
        num_vertices: u32,
    },
}

/// A triangulated surface: the closed-surface representation of a segment.
///
/// The mesh is an index buffer over a vertex buffer. It may be empty (zero
/// triangles). Whether it actually bounds a solid is not enforced at
/// construction; see [`SurfaceMesh::is_closed`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    pub(crate) vertices: Vec<Point<Real>>,
    pub(crate) indices: Vec<[u32; 3]>,
}

impl fmt::Debug for SurfaceMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceMesh")
            .field("num_vertices", &self.vertices.len())
            .field("num_triangles", &self.indices.len())
            .finish()
    }
}

impl SurfaceMesh {
    /// Creates a new surface mesh from a vertex buffer and an index buffer.
    pub fn new(
        vertices: Vec<Point<Real>>,
        indices: Vec<[u32; 3]>,
    ) -> Result<Self, SurfaceMeshBuilderError> {
        let num_vertices = vertices.len() as u32;

        for (tri_id, idx) in indices.iter().enumerate() {
            if let Some(vertex) = idx.iter().copied().find(|vid| *vid >= num_vertices) {
                return Err(SurfaceMeshBuilderError::VertexIndexOutOfBounds {
                    triangle: tri_id as u32,
                    vertex,
                    num_vertices,
                });
            }
        }

        Ok(Self { vertices, indices })
    }

    /// A mesh without any vertex nor triangle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The vertex buffer of this mesh.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The index buffer of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The number of triangles forming this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// Does this mesh have no triangle?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the vertices of the `i`-th triangle of this mesh.
    #[inline]
    pub fn triangle(&self, i: usize) -> [Point<Real>; 3] {
        let idx = self.indices[i];
        idx.map(|vid| self.vertices[vid as usize])
    }

    /// An iterator through all the triangles of this mesh.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = [Point<Real>; 3]> + '_ {
        self.indices
            .iter()
            .map(move |idx| idx.map(|vid| self.vertices[vid as usize]))
    }

    /// The bounds of the vertices referenced by at least one triangle.
    ///
    /// Returns `None` for a mesh without triangles.
    pub fn aabb(&self) -> Option<Aabb> {
        if self.indices.is_empty() {
            return None;
        }

        let mut result = Aabb::new_invalid();

        for idx in &self.indices {
            for vid in idx {
                result.take_point(self.vertices[*vid as usize]);
            }
        }

        Some(result)
    }

    /// Transforms in-place the vertices of this mesh by an affine transformation.
    pub fn transform_vertices(&mut self, transform: &HomogeneousMatrix<Real>) {
        self.vertices
            .iter_mut()
            .for_each(|pt| *pt = transform.transform_point(pt));
    }

    /// Returns a copy of this mesh with its vertices transformed.
    #[must_use]
    pub fn transformed(mut self, transform: &HomogeneousMatrix<Real>) -> Self {
        self.transform_vertices(transform);
        self
    }

    /// Appends a second mesh to this mesh.
    pub fn append(&mut self, rhs: &SurfaceMesh) {
        let base_id = self.vertices.len() as u32;
        self.vertices.extend_from_slice(rhs.vertices());
        self.indices.extend(
            rhs.indices()
                .iter()
                .map(|idx| [idx[0] + base_id, idx[1] + base_id, idx[2] + base_id]),
        );
    }

    /// Reverse the orientation of every triangle.
    pub fn reverse(&mut self) {
        self.indices.iter_mut().for_each(|idx| idx.swap(0, 1));
    }

    /// The edges bounding an odd number of triangles.
    ///
    /// Vertices are identified by position, so a triangle soup whose
    /// triangles share positions but not indices is handled like an indexed
    /// mesh. The result is sorted.
    pub fn boundary_edges(&self) -> Vec<SortedPair<u32>> {
        let welded = self.welded_vertex_ids();
        let mut multiplicity: HashMap<SortedPair<u32>, u32> = HashMap::new();

        for idx in &self.indices {
            let w = idx.map(|vid| welded[vid as usize]);

            for (a, b) in [(w[0], w[1]), (w[1], w[2]), (w[2], w[0])] {
                if a == b {
                    // Zero-length edge of a degenerate triangle.
                    continue;
                }

                *multiplicity.entry(SortedPair::new(a, b)).or_insert(0) += 1;
            }
        }

        let mut result: Vec<_> = multiplicity
            .into_iter()
            .filter(|(_, count)| count % 2 == 1)
            .map(|(edge, _)| edge)
            .collect();
        result.sort_unstable();
        result
    }

    /// Does this mesh bound a solid, i.e. has no boundary edge?
    ///
    /// An empty mesh is closed.
    pub fn is_closed(&self) -> bool {
        self.boundary_edges().is_empty()
    }

    /// The signed volume enclosed by this mesh (divergence theorem).
    ///
    /// Positive if the triangles are counter-clockwise when seen from outside.
    /// Only meaningful for closed meshes.
    pub fn signed_volume(&self) -> Real {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// The total area of the triangles of this mesh.
    pub fn area(&self) -> Real {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// The average length of the triangle edges, zero for an empty mesh.
    pub fn mean_edge_length(&self) -> Real {
        if self.indices.is_empty() {
            return 0.0;
        }

        let total: Real = self
            .triangles()
            .map(|[a, b, c]| na::distance(&a, &b) + na::distance(&b, &c) + na::distance(&c, &a))
            .sum();
        total / (3 * self.indices.len()) as Real
    }

    /// Maps every vertex to the smallest index of a vertex at the exact same position.
    fn welded_vertex_ids(&self) -> Vec<u32> {
        let mut first_at: HashMap<[u64; 3], u32> = HashMap::with_capacity(self.vertices.len());

        self.vertices
            .iter()
            .enumerate()
            .map(|(vid, pt)| {
                // `+ 0.0` folds -0.0 into 0.0 so both hash identically.
                let key = [pt.x, pt.y, pt.z].map(|e| (e + 0.0).to_bits());
                match first_at.entry(key) {
                    Entry::Occupied(e) => *e.get(),
                    Entry::Vacant(e) => *e.insert(vid as u32),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::{SurfaceMesh, SurfaceMeshBuilderError};
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};
    use alloc::vec;

    #[test]
    fn out_of_bounds_indices_are_rejected() {
        let err = SurfaceMesh::new(vec![Point::origin(); 3], vec![[0, 1, 2], [0, 3, 1]]);
        assert_eq!(
            err,
            Err(SurfaceMeshBuilderError::VertexIndexOutOfBounds {
                triangle: 1,
                vertex: 3,
                num_vertices: 3
            })
        );
    }

    #[test]
    fn empty_mesh_is_closed_without_bounds() {
        let mesh = SurfaceMesh::empty();
        assert!(mesh.is_closed());
        assert!(mesh.aabb().is_none());
        assert_eq!(mesh.signed_volume(), 0.0);
        assert_eq!(mesh.mean_edge_length(), 0.0);
    }

    #[test]
    fn cube_is_closed_and_open_cube_is_not() {
        let aabb = Aabb::new(Point::origin(), Point::new(1.0, 2.0, 3.0));
        let mut mesh = SurfaceMesh::cuboid(&aabb);
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1.0e-12);
        assert_relative_eq!(mesh.area(), 22.0, epsilon = 1.0e-12);
        assert_eq!(mesh.aabb(), Some(aabb));

        mesh.reverse();
        assert_relative_eq!(mesh.signed_volume(), -6.0, epsilon = 1.0e-12);

        let (vertices, mut indices) = (mesh.vertices().to_vec(), mesh.indices().to_vec());
        let _ = indices.pop();
        let open = SurfaceMesh::new(vertices, indices).unwrap();
        assert_eq!(open.boundary_edges().len(), 3);
        assert!(!open.is_closed());
    }

    #[test]
    fn triangle_soup_is_welded_by_position() {
        let cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0)));
        let mut vertices = vec![];
        let mut indices = vec![];

        for tri in cube.triangles() {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&tri);
            indices.push([base, base + 1, base + 2]);
        }

        let soup = SurfaceMesh::new(vertices, indices).unwrap();
        assert!(soup.is_closed());
    }

    #[test]
    fn append_offsets_indices() {
        let a = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0)));
        let b = a.clone().transformed(&na::Matrix4::new_translation(&Vector::new(
            3.0, 0.0, 0.0,
        )));
        let mut merged = a.clone();
        merged.append(&b);
        assert_eq!(merged.num_triangles(), 2 * a.num_triangles());
        assert!(merged.is_closed());
        assert_relative_eq!(merged.signed_volume(), 2.0, epsilon = 1.0e-12);
        assert_eq!(merged.aabb().unwrap().maxs, Point::new(4.0, 1.0, 1.0));
    }
}
