use serde_json::Value;

use crate::params::Params;

/// Which pieces of interactor state an [`Outcome`](crate::Outcome) carries.
///
/// Maps each exposed name to the storage key the interactor reads it from.
/// Built once per interactor type by
/// [`DefinitionBuilder::expose`](crate::DefinitionBuilder::expose).
///
/// # Examples
///
/// ```
/// use interactor_core::ExposureRegistry;
/// use serde_json::json;
///
/// let mut registry = ExposureRegistry::new();
/// registry.expose("product");
/// registry.expose("product"); // re-registering overwrites
///
/// let payload = registry.snapshot(|key| (key == "product").then(|| json!({ "id": 1 })));
/// assert_eq!(registry.len(), 1);
/// assert_eq!(payload.value("product"), &json!({ "id": 1 }));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposureRegistry {
    entries: Vec<(String, String)>,
}

impl ExposureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes `name`, read from the storage key of the same name.
    pub fn expose(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.register(name.clone(), name);
    }

    /// Exposes `name`, read from `storage_key`.
    ///
    /// An existing mapping for `name` is replaced in place.
    pub fn register(&mut self, name: impl Into<String>, storage_key: impl Into<String>) {
        let name = name.into();
        let storage_key = storage_key.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = storage_key,
            None => self.entries.push((name, storage_key)),
        }
    }

    /// Returns the storage key for an exposed name.
    pub fn storage_key(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, key)| key.as_str())
    }

    /// Returns `true` if `name` is exposed.
    pub fn contains(&self, name: &str) -> bool {
        self.storage_key(name).is_some()
    }

    /// Iterates over exposed names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the number of exposures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is exposed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads every exposure through `read` and collects the values.
    ///
    /// `read` receives the storage key; `None` becomes `Null`.
    pub fn snapshot(&self, read: impl Fn(&str) -> Option<Value>) -> Params {
        self.entries
            .iter()
            .map(|(name, key)| (name.clone(), read(key).unwrap_or(Value::Null)))
            .collect()
    }
}
