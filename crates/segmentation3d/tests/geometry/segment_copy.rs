use segmentation3d::bounding_volume::Aabb;
use segmentation3d::conversion::{ConversionParameters, SegmentationConverter};
use segmentation3d::math::{Point, Vector};
use segmentation3d::na::Translation3;
use segmentation3d::segment::{DefaultRepresentationFactory, Representation, Segment};
use segmentation3d::shape::SurfaceMesh;

#[test]
fn deep_copies_are_independent() {
    let cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(2.0, 2.0, 2.0)));
    let mut source = Segment::with_name("kidney");
    source.set_color([0.8, 0.2, 0.1]);
    source.set_tag("Laterality", "left");
    let _ = source.add_representation(Representation::CLOSED_SURFACE, cube.into());
    SegmentationConverter::with_default_rules()
        .convert_segment(
            &mut source,
            Representation::CLOSED_SURFACE,
            Representation::BINARY_LABELMAP,
            &ConversionParameters::new(),
        )
        .unwrap();

    let mut copy = Segment::new();
    copy.deep_copy_from(&source, &DefaultRepresentationFactory)
        .unwrap();
    assert_eq!(copy.name(), Some("kidney"));
    assert_eq!(copy.color(), [0.8, 0.2, 0.1]);
    assert_eq!(copy.tag("Laterality"), Some("left"));
    assert_eq!(copy.representation_kinds().len(), 2);

    // Mutating the source leaves the copy untouched.
    let shift = Translation3::from(Vector::new(10.0, 0.0, 0.0)).to_homogeneous();
    source
        .representation_mut(Representation::CLOSED_SURFACE)
        .and_then(Representation::as_closed_surface_mut)
        .unwrap()
        .transform_vertices(&shift);
    source
        .representation_mut(Representation::BINARY_LABELMAP)
        .and_then(Representation::as_binary_labelmap_mut)
        .unwrap()
        .fill(0);
    source.set_tag("Laterality", "right");

    assert_eq!(copy.tag("Laterality"), Some("left"));
    assert_eq!(copy.aabb().mins, Point::origin());
    assert_eq!(
        copy.representation(Representation::BINARY_LABELMAP)
            .and_then(Representation::as_binary_labelmap)
            .unwrap()
            .count_nonzero(),
        8
    );

    // Copying again drops kinds the source no longer has.
    let _ = source.remove_representation(Representation::BINARY_LABELMAP);
    copy.deep_copy_from(&source, &DefaultRepresentationFactory)
        .unwrap();
    assert!(!copy.has_representation(Representation::BINARY_LABELMAP));
    assert_eq!(copy.aabb().mins, Point::new(10.0, 0.0, 0.0));
}
