use crate::geometry::{ImageExtent, ImageGeometry};
use crate::math::{Point, Real};
use crate::shape::{Label, LabelVolume, SurfaceMesh};
use alloc::vec;
use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use na::ComplexField; // for .floor() and .ceil()
use ordered_float::OrderedFloat;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rasterizes a closed surface into a new volume sampled on `geometry`.
///
/// Voxels whose center is inside of `mesh` get the label `1`, all others are
/// background. See [`rasterize_into`] for the details of the fill rule.
pub fn rasterize(mesh: &SurfaceMesh, geometry: &ImageGeometry) -> LabelVolume {
    let mut result = LabelVolume::new(*geometry);
    rasterize_into(mesh, &mut result, 1);
    result
}

/// Sets to `label` every voxel of `volume` whose center is inside of `mesh`.
///
/// Each voxel row (fixed `j` and `k`, varying `i`) is intersected with the
/// triangles of the mesh, and the row is filled between consecutive pairs of
/// crossings. Voxels outside of the mesh are left untouched. A mesh that is
/// empty or lies outside of the volume changes nothing.
///
/// Row points are perturbed symbolically so that a row passing exactly
/// through an edge or a vertex crosses the surface once, and a row grazing
/// the surface from one side crosses it zero or two times. The fill is
/// therefore exact for closed meshes without any tolerance.
pub fn rasterize_into(mesh: &SurfaceMesh, volume: &mut LabelVolume, label: Label) {
    let extent = volume.extent();

    if extent.is_empty() || mesh.is_empty() {
        return;
    }

    let to_index = *volume.geometry().world_to_image();
    let pts: Vec<Point<Real>> = mesh
        .vertices()
        .iter()
        .map(|pt| to_index.transform_point(pt))
        .collect();

    let mut rows = RowCrossings::new(extent);

    for idx in mesh.indices() {
        rows.push_triangle(&pts[idx[0] as usize], &pts[idx[1] as usize], &pts[idx[2] as usize]);
    }

    let row_len = extent.dimensions().x;
    let imin = extent.mins.x;
    let imax = extent.maxs.x;

    let fill_row = |(row, crossings): (&mut [Label], &mut Vec<Real>)| {
        if crossings.len() < 2 {
            return;
        }

        crossings.sort_unstable_by_key(|x| OrderedFloat(*x));

        // A trailing unmatched crossing only happens on open meshes and is ignored.
        for pair in crossings.chunks_exact(2) {
            let first = index_after(pair[0]).max(imin as Real);
            let last = (index_after(pair[1]) - 1.0).min(imax as Real);

            if first > last {
                continue;
            }

            let first = (first as i32 - imin) as usize;
            let last = (last as i32 - imin) as usize;
            row[first..=last].fill(label);
        }
    };

    #[cfg(not(feature = "parallel"))]
    volume
        .labels_mut()
        .chunks_mut(row_len)
        .zip(rows.crossings.iter_mut())
        .for_each(fill_row);

    #[cfg(feature = "parallel")]
    volume
        .labels_mut()
        .par_chunks_mut(row_len)
        .zip(rows.crossings.par_iter_mut())
        .for_each(fill_row);
}

/// The smallest integer `i` with `x <= i`, as a float.
#[inline]
fn index_after(x: Real) -> Real {
    x.ceil()
}

/// The `i` coordinates where each voxel row crosses the surface.
struct RowCrossings {
    extent: ImageExtent,
    crossings: Vec<Vec<Real>>,
}

impl RowCrossings {
    fn new(extent: ImageExtent) -> Self {
        let dims = extent.dimensions();
        Self {
            extent,
            crossings: vec![Vec::new(); dims.y * dims.z],
        }
    }

    /// Records the crossings between the triangle `abc` (in voxel-index
    /// coordinates) and every row it covers.
    fn push_triangle(&mut self, a: &Point<Real>, b: &Point<Real>, c: &Point<Real>) {
        let (pa, pb, pc) = ([a.y, a.z], [b.y, b.z], [c.y, c.z]);
        let det = orient2d(pa, pb, pc);

        // Parallel to the rows: never crossed, only grazed.
        if det == 0.0 || !det.is_finite() {
            return;
        }

        // Perturbed row points sit in (j, j + ε) so the candidate rows are
        // the ones with `floor(min) <= j < max`.
        let jmin = (a.y.min(b.y).min(c.y).floor() as i32).max(self.extent.mins.y);
        let jmax = (a.y.max(b.y).max(c.y).ceil() as i32).min(self.extent.maxs.y);
        let kmin = (a.z.min(b.z).min(c.z).floor() as i32).max(self.extent.mins.z);
        let kmax = (a.z.max(b.z).max(c.z).ceil() as i32).min(self.extent.maxs.z);
        let dims = self.extent.dimensions();

        for k in kmin..=kmax {
            for j in jmin..=jmax {
                let p = [j as Real, k as Real];
                let w_a = perturbed_edge_function(pb, pc, p);
                let w_b = perturbed_edge_function(pc, pa, p);
                let w_c = perturbed_edge_function(pa, pb, p);

                let inside = [w_a, w_b, w_c]
                    .iter()
                    .all(|w| w.sign == det.is_sign_positive());

                if !inside {
                    continue;
                }

                let sum = w_a.value + w_b.value + w_c.value;
                let x = if sum != 0.0 {
                    (w_a.value * a.x + w_b.value * b.x + w_c.value * c.x) / sum
                } else {
                    // Only reachable through perturbation on a vanishingly thin triangle.
                    (a.x + b.x + c.x) / 3.0
                };

                let row_id =
                    (j - self.extent.mins.y) as usize + dims.y * (k - self.extent.mins.z) as usize;
                self.crossings[row_id].push(x);
            }
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct EdgeValue {
    value: Real,
    /// `true` if the perturbed value is positive.
    sign: bool,
}

#[inline]
fn orient2d(u: [Real; 2], v: [Real; 2], p: [Real; 2]) -> Real {
    (v[0] - u[0]) * (p[1] - u[1]) - (v[1] - u[1]) * (p[0] - u[0])
}

/// The edge function of the directed edge `u -> v` at `p`, with its sign
/// under the perturbation `p + (ε, ε²)`.
///
/// Endpoints are put in a canonical order before evaluation so that both
/// triangles sharing an edge compute exactly opposite values.
fn perturbed_edge_function(u: [Real; 2], v: [Real; 2], p: [Real; 2]) -> EdgeValue {
    let value = if (u[0], u[1]) <= (v[0], v[1]) {
        orient2d(u, v, p)
    } else {
        -orient2d(v, u, p)
    };

    let sign = if value != 0.0 {
        value > 0.0
    } else {
        let d = [v[0] - u[0], v[1] - u[1]];

        if d[1] != 0.0 {
            d[1] < 0.0
        } else {
            d[0] > 0.0
        }
    };

    EdgeValue { value, sign }
}
