use serde::{
    de::DeserializeOwned,
    ser::{Serialize, SerializeStruct, Serializer},
};
use serde_json::Value;

use crate::{
    error::FieldAccessError,
    errors::{Errors, FullMessages},
    params::Params,
};

/// Names every outcome answers to, whatever the interactor exposes.
const STATUS_FIELDS: [&str; 2] = ["success", "failure"];

/// The result of one [`Instance::call`](crate::Instance::call).
///
/// An `Outcome` is a snapshot: the exposed values as they were right after
/// business logic ran (or was skipped), plus a copy of the error
/// collection. Nothing done to the interactor afterwards changes it.
///
/// # Examples
///
/// ```
/// use interactor_core::{Definition, Errors, Instance, Interactor, Params};
/// use serde_json::{json, Value};
/// use std::convert::Infallible;
/// use std::sync::LazyLock;
///
/// struct Double {
///     product: Option<i64>,
/// }
///
/// impl Interactor for Double {
///     type Error = Infallible;
///
///     fn definition() -> &'static Definition<Self> {
///         static DEFINITION: LazyLock<Definition<Double>> =
///             LazyLock::new(|| Definition::builder("Double").expose(["product"]).build());
///         &DEFINITION
///     }
///
///     fn perform(&mut self, input: Option<Params>, _errors: &mut Errors) -> Result<(), Infallible> {
///         let value = input.and_then(|p| p.value("value").as_i64()).unwrap_or(0);
///         self.product = Some(value * 2);
///         Ok(())
///     }
///
///     fn read(&self, key: &str) -> Option<Value> {
///         match key {
///             "product" => self.product.map(Value::from),
///             _ => None,
///         }
///     }
/// }
///
/// let outcome = Instance::new(Double { product: None })
///     .call(json!({ "value": 10 }))
///     .unwrap();
///
/// assert!(outcome.success());
/// assert_eq!(outcome.get_as::<i64>("product").unwrap(), 20);
/// assert!(outcome.get("secret").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    payload: Params,
    errors: Errors,
}

impl Outcome {
    pub(crate) fn new(payload: Params, errors: Errors) -> Self {
        Self { payload, errors }
    }

    /// Returns `true` if no errors were recorded.
    pub fn success(&self) -> bool {
        !self.failure()
    }

    /// Returns `true` if any error was recorded.
    pub fn failure(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The errors recorded during the call.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// All exposed values.
    pub fn payload(&self) -> &Params {
        &self.payload
    }

    /// Reads an exposed value.
    ///
    /// Exposed names the interactor never set read as `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldAccessError::UnknownField`] if `name` is not exposed.
    pub fn get(&self, name: &str) -> Result<&Value, FieldAccessError> {
        self.payload
            .get(name)
            .ok_or_else(|| FieldAccessError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Reads an exposed value as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldAccessError::UnknownField`] if `name` is not exposed,
    /// or [`FieldAccessError::Deserialize`] if the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, FieldAccessError> {
        let value = self.get(name)?;
        <T as serde::Deserialize>::deserialize(value).map_err(|source| FieldAccessError::Deserialize {
            name: name.to_string(),
            source,
        })
    }

    /// Returns `true` if `name` can be read from this outcome.
    ///
    /// That is the status fields plus every exposed name.
    pub fn responds_to(&self, name: &str) -> bool {
        STATUS_FIELDS.contains(&name) || self.payload.contains_key(name)
    }

    /// Splits the outcome into its payload and errors.
    pub fn into_parts(self) -> (Params, Errors) {
        (self.payload, self.errors)
    }
}

impl FullMessages for Outcome {
    fn full_messages(&self) -> Vec<String> {
        self.errors.full_messages()
    }
}

/// Serializes as `{ "success": bool, "payload": {..}, "errors": {..} }`.
impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 3)?;
        state.serialize_field("success", &self.success())?;
        state.serialize_field("payload", &self.payload)?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}
