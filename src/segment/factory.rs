use super::Representation;

/// Builds empty representations from their kind name or class identifier.
///
/// Used by [`Segment::deep_copy_from`](super::Segment::deep_copy_from) to
/// materialize copy targets, and by the conversion machinery to create
/// conversion outputs. Returning `None` means the kind or class is unknown.
pub trait RepresentationFactory {
    /// Creates an empty representation to be stored under `kind`.
    fn construct_by_kind(&self, kind: &str) -> Option<Representation>;

    /// Creates an empty representation of the class `class_name`.
    fn construct_by_class(&self, class_name: &str) -> Option<Representation>;
}

/// The factory knowing every built-in representation.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultRepresentationFactory;

impl RepresentationFactory for DefaultRepresentationFactory {
    fn construct_by_kind(&self, kind: &str) -> Option<Representation> {
        match kind {
            Representation::CLOSED_SURFACE => Some(Representation::empty_closed_surface()),
            Representation::BINARY_LABELMAP => Some(Representation::empty_binary_labelmap()),
            _ => None,
        }
    }

    fn construct_by_class(&self, class_name: &str) -> Option<Representation> {
        match class_name {
            Representation::SURFACE_MESH_CLASS => Some(Representation::empty_closed_surface()),
            Representation::LABEL_VOLUME_CLASS => Some(Representation::empty_binary_labelmap()),
            _ => None,
        }
    }
}

impl<F: RepresentationFactory + ?Sized> RepresentationFactory for &F {
    fn construct_by_kind(&self, kind: &str) -> Option<Representation> {
        (**self).construct_by_kind(kind)
    }

    fn construct_by_class(&self, class_name: &str) -> Option<Representation> {
        (**self).construct_by_class(class_name)
    }
}
