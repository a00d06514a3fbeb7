/*!
Recursive normalization of live values into JSON-safe form.

The normalizer never fails: values with no JSON mapping become `null` and
each occurrence is logged once. Rules are applied in order, so a vector
that is also iterable is flattened as a vector, not recursed as a list.
*/

use serde_json::{Number, Value as JsonValue};
use tracing::warn;

use crate::value::HostValue;

fn json_f64(f: f64) -> JsonValue {
    match Number::from_f64(f) {
        Some(n) => JsonValue::Number(n),
        None => {
            warn!(value = f, "non-finite float has no JSON form, storing null");
            JsonValue::Null
        }
    }
}

/// Convert a live value into a JSON-safe value.
pub fn normalize(value: &HostValue) -> JsonValue {
    match value {
        HostValue::Vector(items) => JsonValue::Array(items.iter().copied().map(json_f64).collect()),
        HostValue::BoolArray(items) => {
            JsonValue::Array(items.iter().map(|b| JsonValue::Bool(*b)).collect())
        }
        HostValue::IntArray(items) => {
            JsonValue::Array(items.iter().map(|i| JsonValue::from(*i)).collect())
        }
        HostValue::FloatArray(items) => {
            JsonValue::Array(items.iter().copied().map(json_f64).collect())
        }
        HostValue::List(items) => JsonValue::Array(items.iter().map(normalize).collect()),
        HostValue::Map(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(key, val)| (key.clone(), normalize(val)))
                .collect(),
        ),
        HostValue::EnumSet(flags) => JsonValue::Array(
            flags
                .iter()
                .map(|flag| JsonValue::String(flag.clone()))
                .collect(),
        ),
        HostValue::Bool(b) => JsonValue::Bool(*b),
        HostValue::Int(i) => JsonValue::from(*i),
        HostValue::Float(f) => json_f64(*f),
        HostValue::Str(s) => JsonValue::String(s.clone()),
        HostValue::None => JsonValue::Null,
        other => {
            warn!(type_name = other.type_name(), "unsupported value type, storing null");
            JsonValue::Null
        }
    }
}

/// Round every float in a JSON tree to the given number of decimal places.
/// Integers pass through untouched.
pub fn round_floats(value: &mut JsonValue, decimals: u32) {
    match value {
        JsonValue::Number(n) => {
            if n.as_i64().is_none() && n.as_u64().is_none() {
                if let Some(f) = n.as_f64() {
                    let scale = 10f64.powi(decimals as i32);
                    let rounded = (f * scale).round() / scale;
                    if let Some(new) = Number::from_f64(rounded) {
                        *value = JsonValue::Number(new);
                    }
                }
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                round_floats(item, decimals);
            }
        }
        JsonValue::Object(entries) => {
            for (_, entry) in entries.iter_mut() {
                round_floats(entry, decimals);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn test_vector_flattens_to_numbers() {
        let value = HostValue::Vector(vec![1.0, 0.5, -2.0]);
        assert_eq!(normalize(&value), json!([1.0, 0.5, -2.0]));
    }

    #[test]
    fn test_fixed_arrays() {
        assert_eq!(
            normalize(&HostValue::BoolArray(vec![true, false, true])),
            json!([true, false, true])
        );
        assert_eq!(normalize(&HostValue::IntArray(vec![1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_sequences_recurse() {
        let value = HostValue::List(vec![
            HostValue::Int(1),
            HostValue::List(vec![HostValue::Str("a".into()), HostValue::None]),
        ]);
        assert_eq!(normalize(&value), json!([1, ["a", null]]));
    }

    #[test]
    fn test_maps_recurse() {
        let mut entries = BTreeMap::new();
        entries.insert("x".to_string(), HostValue::Float(0.25));
        entries.insert("y".to_string(), HostValue::Bool(true));
        assert_eq!(normalize(&HostValue::Map(entries)), json!({"x": 0.25, "y": true}));
    }

    #[test]
    fn test_sets_become_arrays() {
        let flags: BTreeSet<String> =
            ["VERT", "EDGE"].iter().map(|s| s.to_string()).collect();
        assert_eq!(normalize(&HostValue::EnumSet(flags)), json!(["EDGE", "VERT"]));
    }

    #[test]
    fn test_primitives_pass_through() {
        assert_eq!(normalize(&HostValue::Bool(false)), json!(false));
        assert_eq!(normalize(&HostValue::Int(-3)), json!(-3));
        assert_eq!(normalize(&HostValue::Str("seed".into())), json!("seed"));
        assert_eq!(normalize(&HostValue::None), json!(null));
    }

    #[test]
    fn test_unsupported_becomes_null() {
        assert_eq!(normalize(&HostValue::Opaque("ImageHandle".into())), json!(null));
        let nested = HostValue::List(vec![HostValue::Int(1), HostValue::Opaque("Mesh".into())]);
        assert_eq!(normalize(&nested), json!([1, null]));
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(normalize(&HostValue::Float(f64::NAN)), json!(null));
        assert_eq!(normalize(&HostValue::Float(f64::INFINITY)), json!(null));
    }

    #[test]
    fn test_round_floats() {
        let mut value = json!({"a": 0.123456789, "b": [1.00004, 7], "c": "s"});
        round_floats(&mut value, 4);
        assert_eq!(value, json!({"a": 0.1235, "b": [1.0, 7], "c": "s"}));
    }
}
