use segmentation3d::bounding_volume::Aabb;
use segmentation3d::conversion::{
    automatic_oversampling_factor, ConversionParameters, SegmentationConverter,
    OVERSAMPLING_FACTOR_PARAMETER,
};
use segmentation3d::geometry::{ImageExtent, ImageGeometry};
use segmentation3d::math::{Point, Real, Vector};
use segmentation3d::na::Rotation3;
use segmentation3d::rasterization;
use segmentation3d::segment::{Representation, Segment};
use segmentation3d::shape::{LabelVolume, SurfaceMesh};

fn rand_in(rng: &mut oorandom::Rand64, min: Real, max: Real) -> Real {
    min + rng.rand_float() * (max - min)
}

fn convert(mesh: SurfaceMesh, params: &ConversionParameters) -> LabelVolume {
    let mut segment = Segment::new();
    let _ = segment.add_representation(Representation::CLOSED_SURFACE, mesh.into());
    SegmentationConverter::with_default_rules()
        .convert_segment(
            &mut segment,
            Representation::CLOSED_SURFACE,
            Representation::BINARY_LABELMAP,
            params,
        )
        .unwrap();
    segment
        .remove_representation(Representation::BINARY_LABELMAP)
        .and_then(|repr| match repr {
            Representation::BinaryLabelmap(volume) => Some(volume),
            _ => None,
        })
        .unwrap()
}

#[test]
fn filled_voxels_stay_within_surface_bounds() {
    let mut rng = oorandom::Rand64::new(7);

    for _ in 0..20 {
        let center = Point::new(
            rand_in(&mut rng, -20.0, 20.0),
            rand_in(&mut rng, -20.0, 20.0),
            rand_in(&mut rng, -20.0, 20.0),
        );
        let radius = rand_in(&mut rng, 3.0, 8.0);
        let mesh = SurfaceMesh::uv_sphere(center, radius, 24, 12);
        let bounds = mesh.aabb().unwrap();

        let spacing = Vector::new(
            rand_in(&mut rng, 0.5, 1.5),
            rand_in(&mut rng, 0.5, 1.5),
            rand_in(&mut rng, 0.5, 1.5),
        );
        let directions = Rotation3::from_euler_angles(
            rand_in(&mut rng, 0.0, 6.0),
            rand_in(&mut rng, 0.0, 6.0),
            rand_in(&mut rng, 0.0, 6.0),
        )
        .into_inner();
        let reference = ImageGeometry::new(
            Point::new(
                rand_in(&mut rng, -5.0, 5.0),
                rand_in(&mut rng, -5.0, 5.0),
                rand_in(&mut rng, -5.0, 5.0),
            ),
            spacing,
            directions,
            ImageExtent::from_array([0, 1, 0, 1, 0, 1]),
        )
        .unwrap();

        let mut params = ConversionParameters::new();
        params.set_reference_geometry(&reference);
        let volume = convert(mesh, &params);
        let tolerance = spacing.max();
        let loose_bounds = bounds.loosened(tolerance);

        assert!(volume.count_nonzero() > 0);
        for ijk in volume.nonzero_voxels() {
            let pt = volume.geometry().voxel_center(ijk.x, ijk.y, ijk.z);
            assert!(loose_bounds.contains_local_point(&pt));
        }
    }
}

#[test]
fn automatic_oversampling_is_never_degenerate() {
    let mut rng = oorandom::Rand64::new(1234);
    let mut params = ConversionParameters::new();
    params.set(OVERSAMPLING_FACTOR_PARAMETER, "A");

    for _ in 0..30 {
        let spacing = rand_in(&mut rng, 0.2, 2.0);
        let size = spacing * rand_in(&mut rng, 0.2, 40.0);
        let mins = Point::new(
            rand_in(&mut rng, -10.0, 10.0),
            rand_in(&mut rng, -10.0, 10.0),
            rand_in(&mut rng, -10.0, 10.0),
        );
        let cube = SurfaceMesh::cuboid(&Aabb::new(mins, mins + Vector::repeat(size)));
        let factor = automatic_oversampling_factor(&cube, &Vector::repeat(spacing));
        assert!([0.5, 1.0, 2.0, 4.0, 8.0].contains(&factor));

        let reference = ImageGeometry::identity(
            Point::origin(),
            Vector::repeat(spacing),
            ImageExtent::from_array([0, 1, 0, 1, 0, 1]),
        )
        .unwrap();
        params.set_reference_geometry(&reference);

        let volume = convert(cube, &params);
        assert!(!volume.extent().is_empty());
        assert!(volume.count_nonzero() > 0);
        assert!(volume.geometry().spacing().x <= spacing * 2.0 + 1.0e-12);
    }
}

#[test]
fn oversampling_preserves_coverage() {
    let mesh = SurfaceMesh::uv_sphere(Point::new(0.3, 0.2, 0.1), 6.0, 32, 16);
    let volume_1 = convert(mesh.clone(), &ConversionParameters::new());

    let mut params = ConversionParameters::new();
    params.set(OVERSAMPLING_FACTOR_PARAMETER, 2);
    let volume_2 = convert(mesh.clone(), &params);

    let count_1 = volume_1.count_nonzero() as Real;
    let count_2 = volume_2.count_nonzero() as Real;
    let ratio = count_2 / count_1;
    assert!(ratio > 6.4 && ratio < 9.6, "ratio: {}", ratio);

    // Both approximate the enclosed volume.
    let enclosed = mesh.signed_volume();
    assert!((count_1 - enclosed).abs() < 0.1 * enclosed);
    assert!((count_2 / 8.0 - enclosed).abs() < 0.05 * enclosed);
}

#[test]
fn rasterizing_twice_is_idempotent() {
    let mesh = SurfaceMesh::uv_sphere(Point::new(1.0, 2.0, 3.0), 4.0, 16, 8);
    let geometry = ImageGeometry::identity(
        Point::new(-4.0, -4.0, -4.0),
        Vector::repeat(0.75),
        ImageExtent::from_array([0, 20, 0, 20, 0, 20]),
    )
    .unwrap();

    let mut volume = rasterization::rasterize(&mesh, &geometry);
    let first = volume.clone();
    rasterization::rasterize_into(&mesh, &mut volume, 1);
    assert_eq!(volume, first);
}
