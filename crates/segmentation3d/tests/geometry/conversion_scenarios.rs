use segmentation3d::bounding_volume::Aabb;
use segmentation3d::conversion::{
    ConversionError, ConversionParameters, ErrorCategory, SegmentationConverter,
    CROP_TO_REFERENCE_PARAMETER, OVERSAMPLING_FACTOR_PARAMETER,
};
use segmentation3d::geometry::{ImageExtent, ImageGeometry};
use segmentation3d::math::{Point, Vector};
use segmentation3d::segment::{Representation, Segment};
use segmentation3d::shape::{LabelVolume, SurfaceMesh};

fn segment_with_surface(mesh: SurfaceMesh) -> Segment {
    let mut segment = Segment::with_name("structure");
    let _ = segment.add_representation(Representation::CLOSED_SURFACE, mesh.into());
    segment
}

fn convert(segment: &mut Segment, params: &ConversionParameters) -> Result<(), ConversionError> {
    SegmentationConverter::with_default_rules().convert_segment(
        segment,
        Representation::CLOSED_SURFACE,
        Representation::BINARY_LABELMAP,
        params,
    )
}

fn labelmap(segment: &Segment) -> &LabelVolume {
    segment
        .representation(Representation::BINARY_LABELMAP)
        .and_then(Representation::as_binary_labelmap)
        .unwrap()
}

fn reference_geometry() -> ImageGeometry {
    ImageGeometry::identity(
        Point::origin(),
        Vector::repeat(1.0),
        ImageExtent::from_array([0, 4, 0, 4, 0, 4]),
    )
    .unwrap()
}

#[test]
fn unit_cube_without_parameters() {
    let cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0)));
    let mut segment = segment_with_surface(cube);
    convert(&mut segment, &ConversionParameters::new()).unwrap();

    let volume = labelmap(&segment);
    assert_eq!(volume.geometry().origin(), Point::origin());
    assert_eq!(volume.geometry().spacing(), Vector::repeat(1.0));
    assert_eq!(volume.count_nonzero(), 1);
    assert_eq!(volume.get(0, 0, 0), Some(1));
}

#[test]
fn unit_cube_with_oversampling() {
    let cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0)));
    let mut segment = segment_with_surface(cube);
    let mut params = ConversionParameters::new();
    params.set(OVERSAMPLING_FACTOR_PARAMETER, 2);
    convert(&mut segment, &params).unwrap();

    let volume = labelmap(&segment);
    assert_eq!(volume.geometry().spacing(), Vector::repeat(0.5));
    assert_eq!(volume.count_nonzero(), 8);
}

#[test]
fn crop_to_reference() {
    let cube = SurfaceMesh::cuboid(&Aabb::new(
        Point::new(-5.0, -5.0, -5.0),
        Point::new(10.0, 10.0, 10.0),
    ));
    let reference = reference_geometry();
    let mut params = ConversionParameters::new();
    params.set_reference_geometry(&reference);

    let mut uncropped = segment_with_surface(cube.clone());
    convert(&mut uncropped, &params).unwrap();
    let volume = labelmap(&uncropped);
    assert_eq!(volume.extent().as_array(), [-5, 10, -5, 10, -5, 10]);
    assert_eq!(volume.count_nonzero(), 15 * 15 * 15);

    params.set(CROP_TO_REFERENCE_PARAMETER, 1);
    let mut cropped = segment_with_surface(cube);
    convert(&mut cropped, &params).unwrap();
    let volume = labelmap(&cropped);
    assert_eq!(volume.extent(), reference.extent());
    assert!(volume.geometry().is_same_lattice(&reference, 1.0e-12));
    assert_eq!(volume.count_nonzero(), 5 * 5 * 5);
}

#[test]
fn crop_without_reference_is_ignored() {
    let cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(3.0, 3.0, 3.0)));
    let mut params = ConversionParameters::new();
    params.set(CROP_TO_REFERENCE_PARAMETER, "true");

    let mut segment = segment_with_surface(cube);
    convert(&mut segment, &params).unwrap();
    assert_eq!(labelmap(&segment).count_nonzero(), 27);
}

#[test]
fn empty_surface_yields_blank_labelmap() {
    let mut segment = segment_with_surface(SurfaceMesh::empty());
    convert(&mut segment, &ConversionParameters::new()).unwrap();
    let volume = labelmap(&segment);
    assert!(volume.is_empty());
    assert_eq!(volume.count_nonzero(), 0);

    let reference = reference_geometry();
    let mut params = ConversionParameters::new();
    params.set_reference_geometry(&reference);
    params.set(OVERSAMPLING_FACTOR_PARAMETER, "A");

    let mut segment = segment_with_surface(SurfaceMesh::empty());
    convert(&mut segment, &params).unwrap();
    let volume = labelmap(&segment);
    assert_eq!(volume.extent(), reference.extent());
    assert_eq!(volume.labels().len(), 125);
    assert_eq!(volume.count_nonzero(), 0);
}

#[test]
fn open_surface_is_rejected() {
    let mut cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(2.0, 2.0, 2.0)));
    let vertices = cube.vertices().to_vec();
    let mut indices = cube.indices().to_vec();
    let _ = indices.pop();
    cube = SurfaceMesh::new(vertices, indices).unwrap();

    let mut segment = segment_with_surface(cube);
    let err = convert(&mut segment, &ConversionParameters::new()).unwrap_err();
    assert_eq!(err, ConversionError::OpenSurface { boundary_edges: 3 });
    assert_eq!(err.category(), ErrorCategory::InputInvalid);
    assert!(!segment.has_representation(Representation::BINARY_LABELMAP));
}

#[test]
fn existing_labelmap_is_replaced() {
    let cube = SurfaceMesh::cuboid(&Aabb::new(Point::origin(), Point::new(2.0, 2.0, 2.0)));
    let mut segment = segment_with_surface(cube);

    let mut stale = LabelVolume::new(reference_geometry());
    stale.fill(1);
    let _ = segment.add_representation(Representation::BINARY_LABELMAP, stale.into());

    convert(&mut segment, &ConversionParameters::new()).unwrap();
    let volume = labelmap(&segment);
    assert_eq!(volume.extent().as_array(), [0, 2, 0, 2, 0, 2]);
    assert_eq!(volume.count_nonzero(), 8);
}
