use approx::assert_relative_eq;
use segmentation3d::geometry::{ImageExtent, ImageGeometry};
use segmentation3d::math::{Point, Vector};
use segmentation3d::na::Rotation3;

fn random_geometry(rng: &mut oorandom::Rand64) -> ImageGeometry {
    let origin = Point::new(
        rng.rand_float() * 200.0 - 100.0,
        rng.rand_float() * 200.0 - 100.0,
        rng.rand_float() * 200.0 - 100.0,
    );
    let spacing = Vector::new(
        0.1 + rng.rand_float() * 3.0,
        0.1 + rng.rand_float() * 3.0,
        0.1 + rng.rand_float() * 3.0,
    );
    let directions = Rotation3::from_euler_angles(
        rng.rand_float() * 6.0,
        rng.rand_float() * 6.0,
        rng.rand_float() * 6.0,
    )
    .into_inner();
    let mins = [
        rng.rand_range(0..20) as i32 - 10,
        rng.rand_range(0..20) as i32 - 10,
        rng.rand_range(0..20) as i32 - 10,
    ];
    let extent = ImageExtent::from_array([
        mins[0],
        mins[0] + rng.rand_range(0..64) as i32,
        mins[1],
        mins[1] + rng.rand_range(0..64) as i32,
        mins[2],
        mins[2] + rng.rand_range(0..64) as i32,
    ]);

    ImageGeometry::new(origin, spacing, directions, extent).unwrap()
}

#[test]
fn random_geometry_strings_round_trip() {
    let mut rng = oorandom::Rand64::new(42);

    for _ in 0..200 {
        let geometry = random_geometry(&mut rng);
        let text = geometry.to_string();
        assert_eq!(text.split(';').count(), 23);

        let parsed: ImageGeometry = text.parse().unwrap();
        assert_eq!(parsed.extent(), geometry.extent());
        assert_relative_eq!(parsed, geometry, epsilon = 1.0e-9);
        assert_relative_eq!(
            parsed.index_to_world(&Point::new(3.0, -2.0, 7.0)),
            geometry.index_to_world(&Point::new(3.0, -2.0, 7.0)),
            epsilon = 1.0e-9
        );
    }
}
