use crate::{
    register_object, ConstructionError, Object, ObjectMarker, ObjectMeta, ObjectRequirements,
};
use serde::de::DeserializeOwned;
use vy_derive::ObjectMarker;

const VALUE_KEY: &str = "value_";

/// A single value stored inline in its metadata
#[derive(Clone, Default, PartialEq, Debug, ObjectMarker)]
#[object_type(name = "vineyard::Scalar")]
pub struct Scalar<T> {
    value: T,
    meta: Option<ObjectMeta>,
}

impl<T> Scalar<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: ObjectRequirements + DeserializeOwned> Object for Scalar<T> {
    fn construct(&mut self, meta: &ObjectMeta) -> Result<(), ConstructionError> {
        ConstructionError::check_type_name(meta, &Self::_type_name())?;
        self.value = meta.get_key_value(VALUE_KEY)?;
        self.meta = Some(meta.clone());
        Ok(())
    }

    fn meta(&self) -> Option<&ObjectMeta> {
        self.meta.as_ref()
    }
}

/// Handle to a raw payload in the store. Only the recorded size is tracked here,
/// the payload itself is owned by the shared-memory allocator.
#[derive(Clone, Default, PartialEq, Debug, ObjectMarker)]
#[object_type(name = "vineyard::Blob")]
pub struct Blob {
    size: usize,
    meta: Option<ObjectMeta>,
}

impl Blob {
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Object for Blob {
    fn construct(&mut self, meta: &ObjectMeta) -> Result<(), ConstructionError> {
        ConstructionError::check_type_name(meta, &Self::_type_name())?;
        self.size = meta.nbytes();
        self.meta = Some(meta.clone());
        Ok(())
    }

    fn meta(&self) -> Option<&ObjectMeta> {
        self.meta.as_ref()
    }
}

register_object!(Blob);
register_object!(Scalar<i32>);
register_object!(Scalar<i64>);
register_object!(Scalar<u32>);
register_object!(Scalar<u64>);
register_object!(Scalar<f32>);
register_object!(Scalar<f64>);
register_object!(Scalar<bool>);
register_object!(Scalar<String>);
