use crate::{
    DuplicatePolicy, FactoryConfig, FactoryError, Initializer, Object, ObjectMarker, ObjectMeta,
    ObjectRegistration, Registry, SharedRegistry,
};
use once_cell::sync::OnceCell;
use std::{
    collections::hash_map::Entry,
    fmt::Debug,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

static GLOBAL_FACTORY: OnceCell<ObjectFactory> = OnceCell::new();

/// The ObjectFactory maps registered type names to constructors.
/// It builds objects from a type name alone, or from a type name plus the metadata
/// the object was stored with, handing back a `Box<dyn Object>`.
pub struct ObjectFactory {
    initializers: SharedRegistry<String, Initializer>,
    config: FactoryConfig,
}

impl ObjectFactory {
    /// An empty factory with the default config
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    pub fn with_config(config: impl Into<FactoryConfig>) -> Self {
        Self {
            initializers: Arc::new(RwLock::new(Registry::new())),
            config: config.into(),
        }
    }

    /// A factory already holding every type submitted with `register_object!`
    pub fn bootstrap(config: impl Into<FactoryConfig>) -> Self {
        let factory = Self::with_config(config);
        factory.register_submitted();
        factory
    }

    /// The process-wide factory, bootstrapped with the default config on first access.
    /// Concurrent first accesses construct it exactly once.
    pub fn global() -> &'static ObjectFactory {
        GLOBAL_FACTORY.get_or_init(|| Self::bootstrap(FactoryConfig::default()))
    }

    /// Create the process-wide factory with `config`, fails if it already exists
    pub fn init_global(
        config: impl Into<FactoryConfig>,
    ) -> Result<&'static ObjectFactory, FactoryError> {
        let mut created = false;
        let factory = GLOBAL_FACTORY.get_or_init(|| {
            created = true;
            Self::bootstrap(config)
        });
        if created {
            Ok(factory)
        } else {
            Err(FactoryError::AlreadyInitialized)
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Registers every `register_object!` submission linked into the binary.
    /// Returns how many were accepted under the duplicate policy.
    pub fn register_submitted(&self) -> usize {
        let mut accepted = 0;
        for registration in inventory::iter::<ObjectRegistration> {
            if self.insert(registration.type_name(), registration.initializer()) {
                accepted += 1;
            }
        }
        tracing::debug!(accepted, "registered submitted object types");
        accepted
    }

    /// Registers `T` under its type name.
    /// Always true with `DuplicatePolicy::Overwrite`, false if `DuplicatePolicy::Reject` refused a collision.
    pub fn register<T: Object + ObjectMarker>(&self) -> bool {
        self.insert(T::_type_name(), ObjectRegistration::of::<T>().initializer())
    }

    /// Registers an arbitrary constructor under `type_name`, following the duplicate policy
    pub fn register_with<F>(&self, type_name: impl Into<String>, initializer: F) -> bool
    where
        F: Fn() -> Box<dyn Object> + Send + Sync + 'static,
    {
        self.insert(type_name.into(), Arc::new(initializer))
    }

    /// Registers `T`, failing on a name collision whatever the duplicate policy says
    pub fn try_register<T: Object + ObjectMarker>(&self) -> Result<(), FactoryError> {
        match self.write().entry(T::_type_name()) {
            Entry::Occupied(entry) => Err(FactoryError::DuplicateType(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(type_name = %entry.key(), "object type registered");
                entry.insert(ObjectRegistration::of::<T>().initializer());
                Ok(())
            }
        }
    }

    fn insert(&self, type_name: String, initializer: Initializer) -> bool {
        match self.write().entry(type_name) {
            Entry::Occupied(mut entry) => match self.config.duplicate_policy {
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(type_name = %entry.key(), "overwriting constructor of registered object type");
                    entry.insert(initializer);
                    true
                }
                DuplicatePolicy::Reject => false,
            },
            Entry::Vacant(entry) => {
                tracing::debug!(type_name = %entry.key(), "object type registered");
                entry.insert(initializer);
                true
            }
        }
    }

    /// Build a default instance of the type registered as `type_name`
    pub fn create(&self, type_name: &str) -> Result<Box<dyn Object>, FactoryError> {
        // the read lock is released here, constructors may call back into the factory
        let initializer = self
            .read()
            .get(type_name)
            .cloned()
            .ok_or_else(|| FactoryError::TypeNotRegistered(type_name.to_string()))?;
        tracing::trace!(type_name, "creating object");
        Ok(initializer())
    }

    /// Build the type registered as `type_name` and construct it from `meta`
    pub fn create_with_meta(
        &self,
        type_name: &str,
        meta: &ObjectMeta,
    ) -> Result<Box<dyn Object>, FactoryError> {
        let mut object = self.create(type_name)?;
        object
            .construct(meta)
            .map_err(|source| FactoryError::Construction {
                type_name: type_name.to_string(),
                source,
            })?;
        Ok(object)
    }

    /// Build an object from metadata alone, using the type name recorded in it
    pub fn create_from_meta(&self, meta: &ObjectMeta) -> Result<Box<dyn Object>, FactoryError> {
        let type_name = meta.type_name().ok_or(FactoryError::MissingTypeName)?;
        self.create_with_meta(type_name, meta)
    }

    /// Build the member object nested under `name` in `meta`
    pub fn create_member(
        &self,
        meta: &ObjectMeta,
        name: &str,
    ) -> Result<Box<dyn Object>, FactoryError> {
        self.create_from_meta(&meta.member_meta(name)?)
    }

    /// Read-only view of every registration.
    /// The view holds the registry's read lock: registering on the same thread while it is
    /// alive deadlocks, drop it first.
    pub fn factory_ref(&self) -> FactoryRef<'_> {
        FactoryRef {
            initializers: self.read(),
        }
    }

    /// Sorted names of every registered type
    pub fn registered_types(&self) -> Vec<String> {
        let mut type_names: Vec<String> = self.read().keys().cloned().collect();
        type_names.sort();
        type_names
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.read().contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic can't leave the map half-updated, so poisoned locks are recovered
    fn read(&self) -> RwLockReadGuard<'_, Registry<String, Initializer>> {
        self.initializers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry<String, Initializer>> {
        self.initializers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ObjectFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Impl Debug manually as `Fn()` doesn't support `Debug`
impl Debug for ObjectFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectFactory")
            .field("types", &self.registered_types())
            .field("config", &self.config)
            .finish()
    }
}

/// Read-only view over a factory's registrations, returned by `ObjectFactory::factory_ref`
pub struct FactoryRef<'a> {
    initializers: RwLockReadGuard<'a, Registry<String, Initializer>>,
}

impl<'a> FactoryRef<'a> {
    pub fn len(&self) -> usize {
        self.initializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initializers.is_empty()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.initializers.contains_key(type_name)
    }

    pub fn get(&self, type_name: &str) -> Option<&Initializer> {
        self.initializers.get(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Initializer)> {
        self.initializers
            .iter()
            .map(|(type_name, initializer)| (type_name.as_str(), initializer))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.initializers.keys().map(String::as_str)
    }
}

/// Macro to register an object type at load time, collected by `ObjectFactory::global()`
/// and `ObjectFactory::bootstrap`. Used at item position.
#[macro_export]
macro_rules! register_object {
    ($object:ty) => {
        $crate::__private::inventory::submit! {
            $crate::ObjectRegistration::of::<$object>()
        }
    };
}

/// Macro to register an object type with any factory.
#[macro_export]
macro_rules! register_object_with {
    ($factory:expr, $object:ty) => {{
        if !$factory.register::<$object>() {
            panic!(
                "Failed to register object type {} in factory {}: type name already registered",
                stringify!($object),
                stringify!($factory)
            );
        }
    }};
}
