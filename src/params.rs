//! Call arguments and the options mapping handed to business logic.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::UsageError;

static NULL: Value = Value::Null;

/// An ordered mapping of attribute names to dynamic values.
///
/// `Params` is the options object a caller passes to
/// [`Instance::call`](crate::Instance::call), the shape the allow-list
/// sanitizer produces, and the payload snapshot carried by an
/// [`Outcome`](crate::Outcome). Keys keep insertion order.
///
/// `Value::Null` doubles as the "absent" marker: [`Params::value`] returns it
/// for keys that were never set.
///
/// # Examples
///
/// ```
/// use interactor_core::Params;
/// use serde_json::json;
///
/// let params: Params = [("name", json!("Qiitan")), ("price", json!(100))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(params.value("name"), &json!("Qiitan"));
/// assert!(params.value("missing").is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    inner: Map<String, Value>,
}

impl Params {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self { inner: Map::new() }
    }

    /// Returns the value stored under `key`, if the key is present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Returns the value stored under `key`, or `Null` when it is absent.
    pub fn value(&self, key: &str) -> &Value {
        self.inner.get(key).unwrap_or(&NULL)
    }

    /// Returns `true` if `key` is present (even when its value is `Null`).
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.insert(key.into(), value.into())
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Iterates over key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the mapping holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Deserializes the mapping into a typed value.
    ///
    /// Business logic typically calls this on its sanitized input to get a
    /// plain struct instead of working with dynamic values.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the mapping does not fit `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.inner.clone()))
    }
}

impl From<Map<String, Value>> for Params {
    fn from(inner: Map<String, Value>) -> Self {
        Self { inner }
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        Value::Object(params.inner)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// The raw positional arguments of a call.
///
/// A well-formed call carries either nothing or exactly one JSON object.
/// Anything else is rejected as a [`UsageError`] before the pipeline starts.
///
/// # Examples
///
/// ```
/// use interactor_core::CallArgs;
/// use serde_json::json;
///
/// assert_eq!(CallArgs::from(()).len(), 0);
/// assert_eq!(CallArgs::from(json!({ "name": "Qiitan" })).len(), 1);
/// assert_eq!(CallArgs::from(vec![json!({}), json!({})]).len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    args: Vec<Value>,
}

impl CallArgs {
    /// Returns the number of positional arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if no arguments were given.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Pulls the single options mapping out of the argument list.
    ///
    /// Zero arguments yield an empty mapping.
    pub(crate) fn extract_options(self) -> Result<Params, UsageError> {
        let mut args = self.args;
        match args.len() {
            0 => Ok(Params::new()),
            1 => match args.pop() {
                Some(Value::Object(map)) => Ok(Params::from(map)),
                Some(other) => Err(UsageError::NotAMapping {
                    found: value_kind(&other),
                }),
                None => Ok(Params::new()),
            },
            given => Err(UsageError::TooManyArguments { given }),
        }
    }
}

impl From<()> for CallArgs {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<Params> for CallArgs {
    fn from(params: Params) -> Self {
        Self {
            args: vec![params.into()],
        }
    }
}

impl From<Value> for CallArgs {
    fn from(value: Value) -> Self {
        Self { args: vec![value] }
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(args: Vec<Value>) -> Self {
        Self { args }
    }
}

impl<const N: usize> From<[Value; N]> for CallArgs {
    fn from(args: [Value; N]) -> Self {
        Self {
            args: args.into(),
        }
    }
}

/// Names the JSON type of a value, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_arguments_extract_to_empty_params() {
        let params = CallArgs::from(()).extract_options().expect("no args is valid");
        assert!(params.is_empty());
    }

    #[test]
    fn single_object_is_extracted() {
        let params = CallArgs::from(json!({ "name": "Qiitan", "price": 100 }))
            .extract_options()
            .expect("single object is valid");

        assert_eq!(params.len(), 2);
        assert_eq!(params.value("price"), &json!(100));
    }

    #[test]
    fn empty_object_is_accepted() {
        let params = CallArgs::from(json!({})).extract_options().unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn non_object_argument_is_rejected() {
        let err = CallArgs::from(json!("string parameter"))
            .extract_options()
            .unwrap_err();

        assert_eq!(err, UsageError::NotAMapping { found: "string" });
    }

    #[test]
    fn null_argument_is_rejected() {
        let err = CallArgs::from(Value::Null).extract_options().unwrap_err();
        assert_eq!(err, UsageError::NotAMapping { found: "null" });
    }

    #[test]
    fn two_arguments_are_rejected() {
        let err = CallArgs::from([json!({ "name": "Qiitan" }), json!({ "price": 100 })])
            .extract_options()
            .unwrap_err();

        assert_eq!(err, UsageError::TooManyArguments { given: 2 });
    }

    #[test]
    fn params_keep_insertion_order() {
        let params: Params = [("b", 1), ("a", 2), ("c", 3)].into_iter().collect();
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn value_returns_null_for_missing_key() {
        let params = Params::new();
        assert_eq!(params.value("anything"), &Value::Null);
        assert!(params.get("anything").is_none());
    }

    #[test]
    fn parse_into_struct() {
        #[derive(Deserialize)]
        struct NewProduct {
            name: String,
            price: i64,
        }

        let params: Params = [("name", json!("Qiitan")), ("price", json!(100))]
            .into_iter()
            .collect();
        let product: NewProduct = params.parse().expect("fits");

        assert_eq!(product.name, "Qiitan");
        assert_eq!(product.price, 100);
    }
}
