/// Bundle of the traits every object type and every generic parameter of one must implement.
/// Users never implement this by hand, the blanket impl covers every compatible type.
pub trait ObjectRequirements: 'static + Send + Sync + Default + std::any::Any + std::fmt::Debug {}
impl<T: 'static + Send + Sync + Default + std::fmt::Debug> ObjectRequirements for T {}

/// `ObjectMarker` marks a type as registrable with an `ObjectFactory` and should be derived for each object type.
/// `Default` doubles as the zero-argument constructor used by the factory.
/// `_type_name` is derived from the module_path and type name, eg. `my_crate::MyObject`
pub trait ObjectMarker: ObjectRequirements {
    fn _type_name() -> String;
}

const STD_CRATES: [&str; 3] = ["core", "alloc", "std"];

/// Name of `T` used when spelling out generic parameters.
/// Primitives and standard library types are shortened, eg. `i32` or `Vec<String>`.
/// Any other type keeps its full path, so `a::Foo` and `b::Foo` stay distinct.
pub fn generic_param_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let std_only = full
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
        .filter(|path| path.contains("::"))
        .all(|path| {
            path.split("::")
                .next()
                .is_some_and(|krate| STD_CRATES.contains(&krate))
        });
    if std_only {
        tynm::type_name::<T>()
    } else {
        full.to_string()
    }
}

/// Appends concrete generic parameters to a base type name, eg. `vy::Scalar` + `[i32]` => `vy::Scalar<i32>`
pub fn type_with_generics(base: &str, params: &[String]) -> String {
    if params.is_empty() {
        base.to_string()
    } else {
        format!("{base}<{}>", params.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod a {
        #[derive(Debug, Default)]
        pub struct Foo;
    }

    mod b {
        #[derive(Debug, Default)]
        pub struct Foo;
    }

    #[test]
    fn std_params_are_short() {
        assert_eq!(generic_param_name::<i32>(), "i32");
        assert_eq!(generic_param_name::<String>(), "String");
        assert_eq!(generic_param_name::<Vec<u8>>(), "Vec<u8>");
    }

    #[test]
    fn user_params_keep_their_path() {
        assert_eq!(
            generic_param_name::<a::Foo>(),
            "vy_core::markers::tests::a::Foo"
        );
        assert_ne!(generic_param_name::<a::Foo>(), generic_param_name::<b::Foo>());
        assert_ne!(
            generic_param_name::<Vec<a::Foo>>(),
            generic_param_name::<Vec<b::Foo>>()
        );
    }

    #[test]
    fn generics_joined() {
        assert_eq!(type_with_generics("vy::Pair", &[]), "vy::Pair");
        assert_eq!(
            type_with_generics("vy::Pair", &["i32".to_string(), "u8".to_string()]),
            "vy::Pair<i32,u8>"
        );
    }
}
