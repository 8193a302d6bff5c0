use crate::{ConstructionError, ObjectID, ObjectMarker, ObjectMeta};
use std::{any::Any, fmt::Debug};

mod sealed {
    /// Only implemented for `ObjectMarker` types, so the blanket `ObjectBase` impl is the only one
    pub trait Sealed {}
}

impl<T: ObjectMarker> sealed::Sealed for T {}

/// Type-erasure helpers every `Object` gets for free through the blanket impl below.
/// Sealed: the casts in `cast` rely on `as_any` returning the object itself.
pub trait ObjectBase: sealed::Sealed + Send + Sync + Debug + Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
    /// The name this object's type is registered under
    fn type_name(&self) -> String;
}

// Blanket implementation for all marked types
impl<T: ObjectMarker> ObjectBase for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> String {
        T::_type_name()
    }
}

/// Abstract base of everything the factory can build.
///
/// A fresh instance comes from `Default`; `construct` then fills it in from stored
/// metadata. Returning an error leaves the instance to be dropped by the caller.
pub trait Object: ObjectBase {
    fn construct(&mut self, meta: &ObjectMeta) -> Result<(), ConstructionError>;

    /// Metadata the object was constructed from, if it keeps it around
    fn meta(&self) -> Option<&ObjectMeta> {
        None
    }

    fn id(&self) -> Option<ObjectID> {
        self.meta().and_then(|meta| meta.id().ok())
    }
}

impl dyn Object {
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
