use serde_json::Value;

use crate::params::Params;

/// Trait for turning raw call options into the options business logic sees.
///
/// `Sanitizer` is the mass-assignment boundary: whatever an implementation
/// returns is exactly what reaches validation and business logic.
///
/// # Invariants
///
/// Implementations MUST:
/// - Never add keys that the interactor did not declare
/// - Never fail: unknown input is dropped, not reported
/// - Not log attribute values (names only)
///
/// # Examples
///
/// ```
/// use interactor_core::{AllowList, Params, Sanitizer};
/// use serde_json::json;
///
/// let sanitizer = AllowList::new(["name", "price"]);
/// let raw: Params = [("name", json!("Qiitan")), ("admin", json!(true))]
///     .into_iter()
///     .collect();
///
/// let clean = sanitizer.sanitize(raw);
/// assert_eq!(clean.keys().collect::<Vec<_>>(), ["name", "price"]);
/// assert!(clean.value("price").is_null());
/// ```
pub trait Sanitizer {
    /// Sanitizes the raw options mapping.
    fn sanitize(&self, params: Params) -> Params;
}

/// A sanitizer that returns its input unchanged.
///
/// Used for interactors that declare no validations: without declared
/// attributes there is nothing to filter against.
///
/// # Examples
///
/// ```
/// use interactor_core::{Params, PassThrough, Sanitizer};
/// use serde_json::json;
///
/// let raw: Params = [("value", json!(10))].into_iter().collect();
/// assert_eq!(PassThrough.sanitize(raw.clone()), raw);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PassThrough;

impl Sanitizer for PassThrough {
    fn sanitize(&self, params: Params) -> Params {
        params
    }
}

/// A sanitizer that keeps exactly the declared attribute names.
///
/// The output holds every declared name, in declaration order. Values come
/// from the input when present and are `Null` otherwise. Keys that were not
/// declared are dropped silently.
///
/// # Security Properties
///
/// - Undeclared keys never reach validation or business logic
/// - Dropping a key is not an error, so probing callers learn nothing
/// - Dropped keys are logged by name at `debug` level, never by value
#[derive(Debug, Clone)]
pub struct AllowList {
    names: Vec<String>,
}

impl AllowList {
    /// Creates an allow-list over `names`.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the allowed names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Sanitizer for AllowList {
    fn sanitize(&self, params: Params) -> Params {
        for dropped in params.keys().filter(|k| !self.names.iter().any(|n| n == *k)) {
            tracing::debug!(attribute = dropped, "dropping undeclared attribute");
        }

        self.names
            .iter()
            .map(|name| {
                let value = params.get(name).cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Params {
        match value {
            Value::Object(map) => map.into(),
            _ => Params::new(),
        }
    }

    #[test]
    fn pass_through_preserves_everything() {
        let input = raw(json!({ "value": 10, "extra": "x" }));
        assert_eq!(PassThrough.sanitize(input.clone()), input);
    }

    #[test]
    fn allow_list_drops_undeclared_keys() {
        let sanitizer = AllowList::new(["name", "price"]);
        let clean = sanitizer.sanitize(raw(json!({
            "name": "Qiitan",
            "price": 100,
            "malicious": "param",
        })));

        assert_eq!(clean, raw(json!({ "name": "Qiitan", "price": 100 })));
        assert!(!clean.contains_key("malicious"));
    }

    #[test]
    fn allow_list_fills_missing_with_null() {
        let sanitizer = AllowList::new(["name", "price"]);
        let clean = sanitizer.sanitize(raw(json!({ "name": "Widget" })));

        assert!(clean.contains_key("price"));
        assert_eq!(clean.value("price"), &Value::Null);
    }

    #[test]
    fn allow_list_uses_declaration_order() {
        let sanitizer = AllowList::new(["price", "name"]);
        let clean = sanitizer.sanitize(raw(json!({ "name": "a", "price": 1 })));

        assert_eq!(clean.keys().collect::<Vec<_>>(), ["price", "name"]);
    }

    #[test]
    fn allow_list_on_empty_input() {
        let sanitizer = AllowList::new(["target_user"]);
        let clean = sanitizer.sanitize(Params::new());

        assert_eq!(clean.len(), 1);
        assert!(clean.value("target_user").is_null());
    }

    #[test]
    fn allow_list_keeps_explicit_null() {
        let sanitizer = AllowList::new(["name"]);
        let clean = sanitizer.sanitize(raw(json!({ "name": null })));
        assert_eq!(clean, raw(json!({ "name": null })));
    }

    mod proptests {
        use super::*;
        use crate::test_utils::{arb_attribute_names, arb_params};
        use proptest::prelude::*;

        proptest! {
            /// Property: output keys are exactly the declared names, in order
            #[test]
            fn proptest_allow_list_output_keys_are_declared(
                names in arb_attribute_names(),
                params in arb_params()
            ) {
                let sanitizer = AllowList::new(names.clone());
                let clean = sanitizer.sanitize(params);
                let keys: Vec<String> = clean.keys().map(str::to_string).collect();
                prop_assert_eq!(keys, names);
            }

            /// Property: declared values survive sanitization unchanged
            #[test]
            fn proptest_allow_list_preserves_declared_values(
                names in arb_attribute_names(),
                params in arb_params()
            ) {
                let sanitizer = AllowList::new(names.clone());
                let clean = sanitizer.sanitize(params.clone());
                for name in &names {
                    prop_assert_eq!(clean.value(name), params.value(name));
                }
            }
        }
    }
}
