use super::SurfaceMesh;
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, PI};
#[cfg(not(feature = "std"))]
use na::ComplexField; // for .sin() and .cos()

impl SurfaceMesh {
    /// Discretize the boundary of an axis-aligned box as a closed triangle mesh.
    ///
    /// The 12 triangles are oriented counter-clockwise when seen from outside.
    pub fn cuboid(aabb: &Aabb) -> SurfaceMesh {
        let (mins, maxs) = (aabb.mins, aabb.maxs);
        let coords = vec![
            Point::new(mins.x, mins.y, maxs.z),
            Point::new(mins.x, mins.y, mins.z),
            Point::new(maxs.x, mins.y, mins.z),
            Point::new(maxs.x, mins.y, maxs.z),
            Point::new(mins.x, maxs.y, maxs.z),
            Point::new(mins.x, maxs.y, mins.z),
            Point::new(maxs.x, maxs.y, mins.z),
            Point::new(maxs.x, maxs.y, maxs.z),
        ];

        let faces = vec![
            [4, 5, 0],
            [5, 1, 0],
            [5, 6, 1],
            [6, 2, 1],
            [6, 7, 3],
            [2, 6, 3],
            [7, 4, 0],
            [3, 7, 0],
            [0, 1, 2],
            [3, 0, 2],
            [7, 6, 5],
            [4, 7, 5],
        ];

        SurfaceMesh {
            vertices: coords,
            indices: faces,
        }
    }

    /// Discretize a sphere as a closed triangle mesh.
    ///
    /// The sphere is cut into `nphi_subdiv` slices between its poles, each
    /// ring having `ntheta_subdiv` vertices. Both poles are single vertices
    /// and rings wrap around without seam duplicates, so the result is closed.
    /// Subdivisions below 3 (around) and 2 (pole to pole) are raised to these values.
    pub fn uv_sphere(
        center: Point<Real>,
        radius: Real,
        ntheta_subdiv: u32,
        nphi_subdiv: u32,
    ) -> SurfaceMesh {
        let ntheta_subdiv = ntheta_subdiv.max(3);
        let nphi_subdiv = nphi_subdiv.max(2);
        let dtheta = 2.0 * PI / ntheta_subdiv as Real;
        let dphi = PI / nphi_subdiv as Real;
        let nrings = nphi_subdiv - 1;

        let mut coords = Vec::with_capacity((nrings * ntheta_subdiv + 2) as usize);
        let mut curr_phi = -FRAC_PI_2 + dphi;

        for _ in 0..nrings {
            push_circle(
                curr_phi.cos(),
                ntheta_subdiv,
                dtheta,
                curr_phi.sin(),
                &mut coords,
            );
            curr_phi += dphi;
        }

        let south = coords.len() as u32;
        coords.push(Point::new(0.0, -1.0, 0.0));
        let north = south + 1;
        coords.push(Point::new(0.0, 1.0, 0.0));

        let mut idx = Vec::new();

        for i in 0..nrings - 1 {
            let bottom = i * ntheta_subdiv;
            let up = bottom + ntheta_subdiv;
            push_ring_indices(bottom, up, ntheta_subdiv, &mut idx);
        }

        push_degenerate_bottom_ring_indices(0, south, ntheta_subdiv, &mut idx);
        push_degenerate_top_ring_indices(
            (nrings - 1) * ntheta_subdiv,
            north,
            ntheta_subdiv,
            &mut idx,
        );

        coords
            .iter_mut()
            .for_each(|pt| *pt = center + pt.coords * radius);

        SurfaceMesh {
            vertices: coords,
            indices: idx,
        }
    }
}

/// Pushes a circle of the `xz` plane, at height `y`, starting on the `+x` axis.
fn push_circle(radius: Real, nsubdiv: u32, dtheta: Real, y: Real, out: &mut Vec<Point<Real>>) {
    let mut curr_theta: Real = 0.0;

    for _ in 0..nsubdiv {
        out.push(Point::new(
            curr_theta.cos() * radius,
            y,
            curr_theta.sin() * radius,
        ));
        curr_theta += dtheta;
    }
}

/// Connects two consecutive circles with a closed band of quads.
fn push_ring_indices(
    base_lower_circle: u32,
    base_upper_circle: u32,
    nsubdiv: u32,
    out: &mut Vec<[u32; 3]>,
) {
    for i in 0..nsubdiv - 1 {
        let bli = base_lower_circle + i;
        let bui = base_upper_circle + i;
        push_rectangle_indices(bui + 1, bui, bli + 1, bli, out);
    }

    // Wrap around.
    push_rectangle_indices(
        base_upper_circle,
        base_upper_circle + nsubdiv - 1,
        base_lower_circle,
        base_lower_circle + nsubdiv - 1,
        out,
    );
}

/// Closes the top of a circle with a fan around `point`.
fn push_degenerate_top_ring_indices(
    base_circle: u32,
    point: u32,
    nsubdiv: u32,
    out: &mut Vec<[u32; 3]>,
) {
    for i in 0..nsubdiv - 1 {
        out.push([base_circle + i, point, base_circle + i + 1]);
    }

    out.push([base_circle + nsubdiv - 1, point, base_circle]);
}

/// Closes the bottom of a circle with a fan around `point`.
fn push_degenerate_bottom_ring_indices(
    base_circle: u32,
    point: u32,
    nsubdiv: u32,
    out: &mut Vec<[u32; 3]>,
) {
    for i in 0..nsubdiv - 1 {
        out.push([base_circle + i + 1, point, base_circle + i]);
    }

    out.push([base_circle, point, base_circle + nsubdiv - 1]);
}

#[inline]
fn push_rectangle_indices(ul: u32, ur: u32, dl: u32, dr: u32, out: &mut Vec<[u32; 3]>) {
    out.push([ul, dl, dr]);
    out.push([dr, ur, ul]);
}
