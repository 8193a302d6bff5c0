use crate::{Object, ObjectMarker};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// A generic registry type using a HashMap.
pub type Registry<K, V> = HashMap<K, V>;

/// A thread-safe shared registry using Arc and RwLock.
pub type SharedRegistry<K, V> = Arc<RwLock<Registry<K, V>>>;

/// Constructor stored for each registered type name.
/// Closures may capture construction parameters, plain `fn` items coerce as well.
pub type Initializer = Arc<dyn Fn() -> Box<dyn Object> + Send + Sync>;

/// Load-time registration record collected through `inventory`.
///
/// Submitted with `register_object!` and picked up when a factory is bootstrapped,
/// see `ObjectFactory::register_submitted`.
pub struct ObjectRegistration {
    type_name: fn() -> String,
    create: fn() -> Box<dyn Object>,
}

impl ObjectRegistration {
    pub const fn of<T: Object + ObjectMarker>() -> Self {
        Self {
            type_name: T::_type_name,
            create: create_default::<T>,
        }
    }

    pub fn type_name(&self) -> String {
        (self.type_name)()
    }

    pub fn initializer(&self) -> Initializer {
        Arc::new(self.create)
    }
}

fn create_default<T: Object + ObjectMarker>() -> Box<dyn Object> {
    Box::new(T::default())
}

inventory::collect!(ObjectRegistration);
