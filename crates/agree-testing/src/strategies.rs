//! # Proptest Strategies
//!
//! Generators for JSON candidates. Floats are excluded so that generated
//! values compare exactly after a serialization round trip.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Scalar JSON values: null, booleans, integers and short strings.
pub fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9_ ]{0,24}".prop_map(Value::String),
    ]
}

/// Arbitrary JSON values nested up to four levels.
pub fn json_value() -> impl Strategy<Value = Value> {
    json_scalar().prop_recursive(
        4,  // depth
        48, // desired size
        6,  // items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Objects with the given keys always present, plus up to three extras.
pub fn json_object_with(keys: &'static [&'static str]) -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(json_value(), keys.len()),
        prop::collection::btree_map("[a-z]{1,8}_x", json_scalar(), 0..3),
    )
        .prop_map(move |(values, extras)| {
            let mut object: Map<String, Value> = extras.into_iter().collect();
            for (key, value) in keys.iter().zip(values) {
                object.insert((*key).to_string(), value);
            }
            Value::Object(object)
        })
}

/// Argument lists of `0..=max` arbitrary values.
pub fn argument_list(max: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(json_value(), 0..=max)
}
