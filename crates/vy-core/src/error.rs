use crate::ObjectMeta;

/// Errors raised while reading or writing `ObjectMeta`
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    #[error("metadata has no key `{0}`")]
    MissingKey(String),
    #[error("metadata value for `{key}` has an unexpected shape")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("metadata must be a JSON object")]
    NotAnObject,
    #[error("malformed metadata json")]
    Json(#[from] serde_json::Error),
    #[error("`{0}` is not a valid object id")]
    InvalidObjectId(String),
}

/// Error returned by an object type when it cannot be built from the supplied metadata.
/// The factory propagates it untouched inside `FactoryError::Construction`.
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    #[error(transparent)]
    Meta(#[from] MetaError),
    #[error("metadata describes `{found}`, expected `{expected}`")]
    TypeMismatch { expected: String, found: String },
    #[error("{0}")]
    Invalid(String),
}

impl ConstructionError {
    /// Fails unless `meta` names `expected` as its type, metadata without a type name is accepted
    pub fn check_type_name(meta: &ObjectMeta, expected: &str) -> Result<(), ConstructionError> {
        match meta.type_name() {
            Some(found) if found != expected => Err(ConstructionError::TypeMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Error type for `ObjectFactory` operations
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("object type `{0}` is not registered")]
    TypeNotRegistered(String),
    #[error("failed to construct `{type_name}` from metadata")]
    Construction {
        type_name: String,
        #[source]
        source: ConstructionError,
    },
    #[error("object type `{0}` is already registered")]
    DuplicateType(String),
    #[error("object metadata carries no type name")]
    MissingTypeName,
    #[error("the global object factory is already initialized")]
    AlreadyInitialized,
    #[error(transparent)]
    Meta(#[from] MetaError),
}

impl FactoryError {
    /// True when the failure means the requested type name has no registered constructor
    pub fn is_not_registered(&self) -> bool {
        matches!(self, FactoryError::TypeNotRegistered(_))
    }
}
