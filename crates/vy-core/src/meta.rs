use crate::MetaError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of an object in the store
pub type ObjectID = u64;

/// Sentinel for objects that have not been assigned an id yet
pub const INVALID_OBJECT_ID: ObjectID = ObjectID::MAX;

const TYPENAME_KEY: &str = "typename";
const ID_KEY: &str = "id";
const NBYTES_KEY: &str = "nbytes";
const INSTANCE_ID_KEY: &str = "instance_id";

/// Formats an id the way the store persists it, `o` followed by 16 hex digits
pub fn object_id_to_string(id: ObjectID) -> String {
    format!("o{id:016x}")
}

/// Parses the `o`-prefixed hex form produced by `object_id_to_string`
pub fn object_id_from_string(id: &str) -> Result<ObjectID, MetaError> {
    id.strip_prefix('o')
        .filter(|hex| !hex.is_empty())
        .and_then(|hex| ObjectID::from_str_radix(hex, 16).ok())
        .ok_or_else(|| MetaError::InvalidObjectId(id.to_string()))
}

/// Metadata describing a stored object: its type name, id, size, plain fields and
/// the metadata of nested member objects. Kept as a JSON tree so it round-trips
/// through the store untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectMeta {
    tree: Map<String, Value>,
}

impl ObjectMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse metadata from its JSON text, which must be a JSON object
    pub fn from_json(json: &str) -> Result<Self, MetaError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, MetaError> {
        match value {
            Value::Object(tree) => Ok(Self { tree }),
            _ => Err(MetaError::NotAnObject),
        }
    }

    pub fn to_json(&self) -> Result<String, MetaError> {
        Ok(serde_json::to_string(&self.tree)?)
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.tree
            .insert(TYPENAME_KEY.to_string(), Value::String(type_name.into()));
    }

    /// The registered type name of the described object, if recorded
    pub fn type_name(&self) -> Option<&str> {
        self.tree.get(TYPENAME_KEY).and_then(Value::as_str)
    }

    pub fn set_id(&mut self, id: ObjectID) {
        self.tree
            .insert(ID_KEY.to_string(), Value::String(object_id_to_string(id)));
    }

    pub fn id(&self) -> Result<ObjectID, MetaError> {
        let id: String = self.get_key_value(ID_KEY)?;
        object_id_from_string(&id)
    }

    pub fn set_nbytes(&mut self, nbytes: usize) {
        self.tree.insert(NBYTES_KEY.to_string(), Value::from(nbytes));
    }

    /// Size of the object's payload, 0 when not recorded
    pub fn nbytes(&self) -> usize {
        self.tree
            .get(NBYTES_KEY)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }

    pub fn set_instance_id(&mut self, instance_id: u64) {
        self.tree
            .insert(INSTANCE_ID_KEY.to_string(), Value::from(instance_id));
    }

    pub fn instance_id(&self) -> Option<u64> {
        self.tree.get(INSTANCE_ID_KEY).and_then(Value::as_u64)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.tree.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tree.keys().map(String::as_str)
    }

    /// Store any serializable value under `key`, replacing a previous value
    pub fn add_key_value<V: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Result<(), MetaError> {
        let value = serde_json::to_value(value)?;
        self.tree.insert(key.into(), value);
        Ok(())
    }

    /// Read the value under `key` as `V`
    pub fn get_key_value<V: DeserializeOwned>(&self, key: &str) -> Result<V, MetaError> {
        let value = self
            .tree
            .get(key)
            .ok_or_else(|| MetaError::MissingKey(key.to_string()))?;
        V::deserialize(value).map_err(|source| MetaError::InvalidValue {
            key: key.to_string(),
            source,
        })
    }

    /// Nest `member` under `name`
    pub fn add_member(&mut self, name: impl Into<String>, member: ObjectMeta) {
        self.tree.insert(name.into(), Value::Object(member.tree));
    }

    /// A member is a nested object carrying its own type name
    pub fn has_member(&self, name: &str) -> bool {
        matches!(self.tree.get(name), Some(Value::Object(tree)) if tree.contains_key(TYPENAME_KEY))
    }

    pub fn member_meta(&self, name: &str) -> Result<ObjectMeta, MetaError> {
        match self.tree.get(name) {
            Some(Value::Object(tree)) => Ok(Self { tree: tree.clone() }),
            Some(_) => Err(MetaError::NotAnObject),
            None => Err(MetaError::MissingKey(name.to_string())),
        }
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.tree
            .iter()
            .filter(|(_, value)| {
                matches!(value, Value::Object(tree) if tree.contains_key(TYPENAME_KEY))
            })
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_id_text_form() {
        assert_eq!(object_id_to_string(0x2a), "o000000000000002a");
        assert_eq!(object_id_from_string("o000000000000002a").unwrap(), 0x2a);
        assert!(object_id_from_string("000000000000002a").is_err());
        assert!(object_id_from_string("o").is_err());
        assert!(object_id_from_string("ozz").is_err());
    }

    #[test]
    fn well_known_fields() {
        let mut meta = ObjectMeta::new();
        assert_eq!(meta.type_name(), None);
        assert_eq!(meta.nbytes(), 0);
        assert!(matches!(meta.id(), Err(MetaError::MissingKey(_))));

        meta.set_type_name("vineyard::Tensor");
        meta.set_id(7);
        meta.set_nbytes(128);
        meta.set_instance_id(3);

        assert_eq!(meta.type_name(), Some("vineyard::Tensor"));
        assert_eq!(meta.id().unwrap(), 7);
        assert_eq!(meta.nbytes(), 128);
        assert_eq!(meta.instance_id(), Some(3));
    }

    #[test]
    fn nbytes_never_wraps() {
        let mut meta = ObjectMeta::new();
        meta.add_key_value("nbytes", -4).unwrap();
        assert_eq!(meta.nbytes(), 0);

        meta.add_key_value("nbytes", u64::MAX).unwrap();
        #[cfg(target_pointer_width = "64")]
        assert_eq!(meta.nbytes(), usize::MAX);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(meta.nbytes(), 0);
    }

    #[test]
    fn key_values() {
        let mut meta = ObjectMeta::new();
        meta.add_key_value("shape", vec![2u64, 3]).unwrap();
        meta.add_key_value("name", "weights").unwrap();

        assert_eq!(meta.get_key_value::<Vec<u64>>("shape").unwrap(), vec![2, 3]);
        assert_eq!(meta.get_key_value::<String>("name").unwrap(), "weights");
        assert!(matches!(
            meta.get_key_value::<u64>("name"),
            Err(MetaError::InvalidValue { ref key, .. }) if key == "name"
        ));
        assert!(matches!(
            meta.get_key_value::<u64>("missing"),
            Err(MetaError::MissingKey(_))
        ));
    }

    #[test]
    fn members() {
        let mut member = ObjectMeta::new();
        member.set_type_name("vineyard::Blob");
        member.set_nbytes(16);

        let mut meta = ObjectMeta::new();
        meta.set_type_name("vineyard::Tensor");
        meta.add_key_value("plain", 1).unwrap();
        meta.add_member("buffer", member.clone());

        assert!(meta.has_member("buffer"));
        assert!(!meta.has_member("plain"));
        assert_eq!(meta.member_meta("buffer").unwrap(), member);
        assert_eq!(meta.member_names().collect::<Vec<_>>(), vec!["buffer"]);
        assert!(matches!(meta.member_meta("plain"), Err(MetaError::NotAnObject)));
        assert!(matches!(meta.member_meta("nope"), Err(MetaError::MissingKey(_))));
    }

    #[test]
    fn json_text() {
        let meta = ObjectMeta::from_json(r#"{"typename":"vineyard::Blob","nbytes":4}"#).unwrap();
        assert_eq!(meta.type_name(), Some("vineyard::Blob"));
        assert_eq!(ObjectMeta::from_json(&meta.to_json().unwrap()).unwrap(), meta);

        assert!(matches!(ObjectMeta::from_json("[1, 2]"), Err(MetaError::NotAnObject)));
        assert!(matches!(ObjectMeta::from_json("{"), Err(MetaError::Json(_))));
    }
}
