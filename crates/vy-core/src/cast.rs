//! Casts between owned object handles.
//!
//! Every cast consumes the source `Box`, ownership moves into the result and is never duplicated.
//! `downcast` is the checked default; `dynamic_pointer_cast` discards the object on mismatch;
//! the unchecked casts live in [`unchecked`] and are `unsafe`.

use crate::Object;
use std::ops::Deref;

/// Widen a concrete object to the abstract base
pub fn upcast<T: Object>(object: Box<T>) -> Box<dyn Object> {
    object
}

/// Runtime checked downcast, handing the object back unchanged if it is not a `T`
pub fn downcast<T: Object, U: Object + ?Sized>(object: Box<U>) -> Result<Box<T>, Box<U>> {
    if object.as_any().is::<T>() {
        // SAFETY: the dynamic type was just checked to be `T`
        Ok(unsafe { Box::from_raw(Box::into_raw(object).cast::<T>()) })
    } else {
        Err(object)
    }
}

/// Runtime checked downcast. On mismatch the object is dropped and `None` returned,
/// use `downcast` to keep the object instead.
pub fn dynamic_pointer_cast<T: Object, U: Object + ?Sized>(object: Box<U>) -> Option<Box<T>> {
    downcast(object).ok()
}

/// Owned, read-only handle. Only `Deref` is exposed until `const_pointer_cast` releases it.
#[derive(Debug)]
pub struct Frozen<T: ?Sized>(Box<T>);

impl<T: ?Sized> Deref for Frozen<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

pub fn freeze<T: ?Sized>(object: Box<T>) -> Frozen<T> {
    Frozen(object)
}

/// Strip the read-only view, restoring mutable access to the owned object
pub fn const_pointer_cast<T: ?Sized>(object: Frozen<T>) -> Box<T> {
    object.0
}

/// Casts that skip the runtime type check, for trusted boundaries only
pub mod unchecked {
    use crate::Object;

    /// Unconditional downcast of an owned object.
    ///
    /// # Safety
    /// The dynamic type of `object` must be `T`. Checked only in debug builds.
    pub unsafe fn static_pointer_cast<T: Object, U: Object + ?Sized>(object: Box<U>) -> Box<T> {
        debug_assert!(
            object.as_any().is::<T>(),
            "static_pointer_cast to {} from {}",
            std::any::type_name::<T>(),
            object.type_name()
        );
        unsafe { Box::from_raw(Box::into_raw(object).cast::<T>()) }
    }

    /// Reinterpret the owning pointer as pointing to a `T`.
    ///
    /// # Safety
    /// The pointee must be a valid `T` with the same size and alignment as the allocation.
    pub unsafe fn reinterpret_pointer_cast<T, U: ?Sized>(object: Box<U>) -> Box<T> {
        unsafe { Box::from_raw(Box::into_raw(object).cast::<T>()) }
    }
}
