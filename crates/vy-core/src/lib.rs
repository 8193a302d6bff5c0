// map `self` to `vy_core` allowing the use of derive macros that use `vy_core::..`
extern crate self as vy_core;
#[cfg(feature = "builtins")]
mod builtins;
pub mod cast;
mod config;
mod error;
mod factory;
mod markers;
mod meta;
mod object;
mod registry;

#[cfg(feature = "builtins")]
pub use builtins::Blob;
#[cfg(feature = "builtins")]
pub use builtins::Scalar;
pub use config::DuplicatePolicy;
pub use config::FactoryConfig;
pub use error::ConstructionError;
pub use error::FactoryError;
pub use error::MetaError;
pub use factory::FactoryRef;
pub use factory::ObjectFactory;
pub use markers::generic_param_name;
pub use markers::type_with_generics;
pub use markers::ObjectMarker;
pub use markers::ObjectRequirements;
pub use meta::object_id_from_string;
pub use meta::object_id_to_string;
pub use meta::ObjectID;
pub use meta::ObjectMeta;
pub use meta::INVALID_OBJECT_ID;
pub use object::Object;
pub use object::ObjectBase;
pub use registry::Initializer;
pub use registry::ObjectRegistration;
pub use registry::Registry;
pub use registry::SharedRegistry;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}

#[cfg(test)]
mod tests {
    use crate::{
        cast, ConstructionError, FactoryConfig, FactoryError, Object, ObjectFactory,
        ObjectMarker, ObjectMeta,
    };
    use pretty_assertions::assert_eq;
    use vy_derive::object;

    /// Dense tensor rebuilt from its metadata
    #[object]
    #[object_type(name = "Tensor")]
    struct Tensor {
        shape: Vec<usize>,
        values: Vec<f64>,
    }

    impl Tensor {
        fn len(&self) -> usize {
            self.shape.iter().product()
        }
    }

    impl Object for Tensor {
        fn construct(&mut self, meta: &ObjectMeta) -> Result<(), ConstructionError> {
            ConstructionError::check_type_name(meta, &Self::_type_name())?;
            let shape: Vec<usize> = meta.get_key_value("shape")?;
            let values: Vec<f64> = meta.get_key_value("values")?;
            if shape.iter().product::<usize>() != values.len() {
                return Err(ConstructionError::Invalid(format!(
                    "shape {shape:?} does not hold {} values",
                    values.len()
                )));
            }
            self.shape = shape;
            self.values = values;
            Ok(())
        }
    }

    /// Object registered at load time only
    #[object]
    struct Submitted;

    impl Object for Submitted {
        fn construct(&mut self, _: &ObjectMeta) -> Result<(), ConstructionError> {
            Ok(())
        }
    }

    crate::register_object!(Submitted);

    fn tensor_meta(shape: &[usize], values: &[f64]) -> ObjectMeta {
        let mut meta = ObjectMeta::new();
        meta.set_type_name("Tensor");
        meta.add_key_value("shape", shape).unwrap();
        meta.add_key_value("values", values).unwrap();
        meta
    }

    #[test]
    fn tensor_scenario() {
        let factory = ObjectFactory::new();
        assert!(factory.register::<Tensor>());

        let object = factory.create("Tensor").unwrap();
        assert!(object.is::<Tensor>());
        assert_eq!(object.type_name(), "Tensor");

        assert!(matches!(
            factory.create("Matrix"),
            Err(FactoryError::TypeNotRegistered(name)) if name == "Matrix"
        ));
        assert!(factory
            .create_with_meta("Matrix", &tensor_meta(&[1], &[1.0]))
            .unwrap_err()
            .is_not_registered());

        let object = factory
            .create_with_meta("Tensor", &tensor_meta(&[2, 2], &[1.0, 2.0, 3.0, 4.0]))
            .unwrap();
        let tensor = cast::downcast::<Tensor, _>(object).unwrap();
        assert_eq!(tensor.shape, vec![2, 2]);
        assert_eq!(tensor.values, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(tensor.len(), 4);

        let malformed = tensor_meta(&[3], &[1.0]);
        assert!(matches!(
            factory.create_with_meta("Tensor", &malformed),
            Err(FactoryError::Construction {
                source: ConstructionError::Invalid(_),
                ..
            })
        ));
    }

    #[cfg(feature = "builtins")]
    #[test]
    fn n_registrations_n_entries() {
        let factory = ObjectFactory::new();
        factory.register::<Tensor>();
        factory.register::<Submitted>();
        factory.register::<crate::Blob>();
        factory.register::<crate::Scalar<u64>>();

        let view = factory.factory_ref();
        assert_eq!(view.len(), 4);
        let names: Vec<String> = view.type_names().map(str::to_string).collect();
        drop(view);
        for name in names {
            assert_eq!(factory.create(&name).unwrap().type_name(), name);
        }
    }

    #[test]
    fn bootstrap_collects_submissions() {
        let factory = ObjectFactory::bootstrap(FactoryConfig::default());
        assert!(factory.is_registered(&Submitted::_type_name()));
        assert!(!factory.is_registered("Tensor"));
    }

    #[test]
    fn global_factory() {
        let global = ObjectFactory::global();
        assert!(std::ptr::eq(global, ObjectFactory::global()));
        assert!(global
            .create(&Submitted::_type_name())
            .unwrap()
            .is::<Submitted>());

        assert!(matches!(
            ObjectFactory::init_global(FactoryConfig::default()),
            Err(FactoryError::AlreadyInitialized)
        ));
    }
}
