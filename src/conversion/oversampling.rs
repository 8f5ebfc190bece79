use crate::math::{Real, Vector};
use crate::shape::SurfaceMesh;
#[cfg(not(feature = "std"))]
use na::ComplexField;

/// The number of voxels the automatic oversampling aims at across a structure.
pub const AUTOMATIC_OVERSAMPLING_TARGET_VOXELS: Real = 24.0;

const MIN_EXPONENT: i32 = -1;
const MAX_EXPONENT: i32 = 3;

/// Picks an oversampling factor adapted to the size of `mesh` relative to `spacing`.
///
/// The structure size is the cube root of the enclosed volume, or the
/// diagonal of the bounding box when the volume vanishes. The factor is the
/// power of two bringing this size closest to, but not below,
/// [`AUTOMATIC_OVERSAMPLING_TARGET_VOXELS`] voxels, clamped to `[0.5, 8]`.
/// Degenerate inputs (empty mesh, non-finite values) yield `1`.
///
/// The result is always one of `0.5`, `1`, `2`, `4` or `8`.
pub fn automatic_oversampling_factor(mesh: &SurfaceMesh, spacing: &Vector<Real>) -> Real {
    let Some(aabb) = mesh.aabb() else {
        return 1.0;
    };

    let mut structure_size = mesh.signed_volume().abs().cbrt();

    if !(structure_size.is_finite() && structure_size > 0.0) {
        structure_size = aabb.extents().norm();
    }

    let voxel_size = (spacing.x * spacing.y * spacing.z).cbrt();
    let voxels_across = structure_size / voxel_size;

    if !(voxels_across.is_finite() && voxels_across > 0.0) {
        log::debug!("Degenerate structure size, no automatic oversampling.");
        return 1.0;
    }

    let exponent = (AUTOMATIC_OVERSAMPLING_TARGET_VOXELS / voxels_across)
        .log2()
        .ceil()
        .clamp(MIN_EXPONENT as Real, MAX_EXPONENT as Real) as i32;
    let factor = (2.0 as Real).powi(exponent);

    log::debug!(
        "Automatic oversampling: {} voxels across the structure, factor {}.",
        voxels_across,
        factor
    );

    factor
}

#[cfg(test)]
mod test {
    use super::automatic_oversampling_factor;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};
    use crate::shape::SurfaceMesh;
    use alloc::vec;

    fn cube(size: f64) -> SurfaceMesh {
        SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(size, size, size)))
    }

    #[test]
    fn factor_follows_structure_size() {
        let spacing = Vector::repeat(1.0);
        assert_eq!(automatic_oversampling_factor(&cube(0.1), &spacing), 8.0);
        assert_eq!(automatic_oversampling_factor(&cube(4.0), &spacing), 8.0);
        assert_eq!(automatic_oversampling_factor(&cube(10.0), &spacing), 4.0);
        assert_eq!(automatic_oversampling_factor(&cube(16.0), &spacing), 2.0);
        assert_eq!(automatic_oversampling_factor(&cube(30.0), &spacing), 1.0);
        assert_eq!(automatic_oversampling_factor(&cube(100.0), &spacing), 0.5);
        assert_eq!(automatic_oversampling_factor(&cube(1000.0), &spacing), 0.5);

        // Only the voxel size relative to the structure matters.
        assert_eq!(
            automatic_oversampling_factor(&cube(4.0), &Vector::repeat(0.25)),
            2.0
        );
    }

    #[test]
    fn degenerate_inputs() {
        let spacing = Vector::repeat(1.0);
        assert_eq!(
            automatic_oversampling_factor(&SurfaceMesh::empty(), &spacing),
            1.0
        );

        // A flat, zero-volume mesh falls back on its bounding box.
        let flat = SurfaceMesh::new(
            vec![
                Point::origin(),
                Point::new(3.0, 0.0, 0.0),
                Point::new(0.0, 4.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 1]],
        )
        .unwrap();
        assert_eq!(automatic_oversampling_factor(&flat, &spacing), 8.0);

        // A single point has no size at all.
        let point = SurfaceMesh::new(vec![Point::origin()], vec![[0, 0, 0]]).unwrap();
        assert_eq!(automatic_oversampling_factor(&point, &spacing), 1.0);
    }
}
