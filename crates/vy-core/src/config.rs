/// `DuplicatePolicy` decides what happens when a type name is registered a second time
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Replace the existing constructor, the last registration wins
    #[default]
    Overwrite,
    /// Keep the existing constructor and report the collision
    Reject,
}

/// `FactoryConfig` contains the config an `ObjectFactory` is created with
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub duplicate_policy: DuplicatePolicy,
}

impl FactoryConfig {
    pub fn new(duplicate_policy: DuplicatePolicy) -> Self {
        Self { duplicate_policy }
    }
}

impl From<DuplicatePolicy> for FactoryConfig {
    fn from(duplicate_policy: DuplicatePolicy) -> Self {
        Self::new(duplicate_policy)
    }
}
