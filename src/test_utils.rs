//! Proptest strategies shared by unit tests.

use proptest::prelude::*;
use serde_json::Value;

use crate::params::Params;

/// Attribute-like names: lowercase identifiers.
pub(crate) fn arb_attribute_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z_]{0,7}").unwrap()
}

/// Distinct attribute names, as a declaration list would hold them.
pub(crate) fn arb_attribute_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(arb_attribute_name(), 0..6)
        .prop_map(|names| names.into_iter().collect())
}

/// Scalar JSON values.
pub(crate) fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::from),
    ]
}

/// Options mappings with arbitrary keys and scalar values.
pub(crate) fn arb_params() -> impl Strategy<Value = Params> {
    prop::collection::vec((arb_attribute_name(), arb_scalar()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}
