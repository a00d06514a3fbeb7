/*!
Value model for the parameter codec.

Property kinds form a closed, explicit taxonomy instead of being probed at
runtime. Single-choice enums travel as plain identifier strings and are not a
distinct kind; multi-choice enum flags are.
*/

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value as JsonValue;

/// Element type of a fixed-length array property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayElem {
    Bool,
    Int,
    Float,
}

/// The kinds of property a modifier can expose to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean scalar
    Bool,
    /// Integer scalar
    Int,
    /// Floating-point scalar
    Float,
    /// String scalar (including single-choice enum identifiers)
    Str,
    /// Fixed-length array of a homogeneous element type
    Array { elem: ArrayElem, len: usize },
    /// Multi-choice set of enum option identifiers
    EnumFlags,
    /// Reference to a single named scene entity
    Object,
    /// Reference to a named collection of entities
    Collection,
    /// Nested collection of named entities, addressed by name in order
    ItemList,
}

impl ValueKind {
    /// Declared length for array kinds, `None` otherwise.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            ValueKind::Array { len, .. } => Some(*len),
            _ => None,
        }
    }

    /// Whether this kind holds a reference into the host scene.
    pub fn is_reference(&self) -> bool {
        matches!(self, ValueKind::Object | ValueKind::Collection)
    }
}

/// A runtime value as the host object model hands it to the codec.
///
/// `Vector` is a vector-like wrapper that flattens to a number list;
/// `Opaque` is a live host handle with no JSON mapping (the payload is the
/// host-side type name, kept for diagnostics).
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    BoolArray(Vec<bool>),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    Vector(Vec<f64>),
    List(Vec<HostValue>),
    Map(BTreeMap<String, HostValue>),
    EnumSet(BTreeSet<String>),
    ObjectRef(String),
    CollectionRef(String),
    Items(Vec<String>),
    Opaque(String),
    None,
}

impl HostValue {
    /// Classify a live value into a property kind, where one exists.
    ///
    /// `List`, `Map`, `Vector`, `Opaque` and `None` have no schema kind;
    /// they only occur on the dynamic socket path.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            HostValue::Bool(_) => Some(ValueKind::Bool),
            HostValue::Int(_) => Some(ValueKind::Int),
            HostValue::Float(_) => Some(ValueKind::Float),
            HostValue::Str(_) => Some(ValueKind::Str),
            HostValue::BoolArray(v) => Some(ValueKind::Array {
                elem: ArrayElem::Bool,
                len: v.len(),
            }),
            HostValue::IntArray(v) => Some(ValueKind::Array {
                elem: ArrayElem::Int,
                len: v.len(),
            }),
            HostValue::FloatArray(v) => Some(ValueKind::Array {
                elem: ArrayElem::Float,
                len: v.len(),
            }),
            HostValue::EnumSet(_) => Some(ValueKind::EnumFlags),
            HostValue::ObjectRef(_) => Some(ValueKind::Object),
            HostValue::CollectionRef(_) => Some(ValueKind::Collection),
            HostValue::Items(_) => Some(ValueKind::ItemList),
            HostValue::Vector(_)
            | HostValue::List(_)
            | HostValue::Map(_)
            | HostValue::Opaque(_)
            | HostValue::None => None,
        }
    }

    /// Host-side type name used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "str",
            HostValue::BoolArray(_) => "bool array",
            HostValue::IntArray(_) => "int array",
            HostValue::FloatArray(_) => "float array",
            HostValue::Vector(_) => "vector",
            HostValue::List(_) => "list",
            HostValue::Map(_) => "map",
            HostValue::EnumSet(_) => "enum set",
            HostValue::ObjectRef(_) => "object reference",
            HostValue::CollectionRef(_) => "collection reference",
            HostValue::Items(_) => "item list",
            HostValue::Opaque(name) => name,
            HostValue::None => "none",
        }
    }

    /// Zero value for a property kind, used when materializing a fresh
    /// modifier from its schema.
    pub fn default_for(kind: &ValueKind) -> HostValue {
        match kind {
            ValueKind::Bool => HostValue::Bool(false),
            ValueKind::Int => HostValue::Int(0),
            ValueKind::Float => HostValue::Float(0.0),
            ValueKind::Str => HostValue::Str(String::new()),
            ValueKind::Array { elem, len } => match elem {
                ArrayElem::Bool => HostValue::BoolArray(vec![false; *len]),
                ArrayElem::Int => HostValue::IntArray(vec![0; *len]),
                ArrayElem::Float => HostValue::FloatArray(vec![0.0; *len]),
            },
            ValueKind::EnumFlags => HostValue::EnumSet(BTreeSet::new()),
            ValueKind::Object | ValueKind::Collection => HostValue::None,
            ValueKind::ItemList => HostValue::Items(Vec::new()),
        }
    }

    /// Coerce a stored JSON value back into a host value for a known kind.
    ///
    /// Array lengths are deliberately not checked here; shape enforcement is
    /// the target object's responsibility and its rejection is reported per
    /// property.
    pub fn from_json(kind: &ValueKind, value: &JsonValue) -> Option<HostValue> {
        match kind {
            ValueKind::Bool => value.as_bool().map(HostValue::Bool),
            ValueKind::Int => value
                .as_i64()
                .or_else(|| value.as_f64().map(|f| f as i64))
                .map(HostValue::Int),
            ValueKind::Float => value.as_f64().map(HostValue::Float),
            ValueKind::Str => value.as_str().map(|s| HostValue::Str(s.to_string())),
            ValueKind::Array { elem, .. } => {
                let items = value.as_array()?;
                match elem {
                    ArrayElem::Bool => items
                        .iter()
                        .map(JsonValue::as_bool)
                        .collect::<Option<Vec<_>>>()
                        .map(HostValue::BoolArray),
                    ArrayElem::Int => items
                        .iter()
                        .map(JsonValue::as_i64)
                        .collect::<Option<Vec<_>>>()
                        .map(HostValue::IntArray),
                    ArrayElem::Float => items
                        .iter()
                        .map(JsonValue::as_f64)
                        .collect::<Option<Vec<_>>>()
                        .map(HostValue::FloatArray),
                }
            }
            ValueKind::EnumFlags => {
                let items = value.as_array()?;
                let flags = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<BTreeSet<_>>>()?;
                Some(HostValue::EnumSet(flags))
            }
            ValueKind::Object => value
                .as_str()
                .map(|s| HostValue::ObjectRef(s.to_string())),
            ValueKind::Collection => value
                .as_str()
                .map(|s| HostValue::CollectionRef(s.to_string())),
            ValueKind::ItemList => {
                let items = value.as_array()?;
                let names = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()?;
                Some(HostValue::Items(names))
            }
        }
    }

    /// Map a stored JSON value structurally, with no schema to consult.
    ///
    /// Homogeneous bool arrays become bool arrays, any other all-numeric
    /// array becomes a float array, everything else nests. A top-level
    /// `null` maps to nothing.
    pub fn from_json_blind(value: &JsonValue) -> Option<HostValue> {
        if value.is_null() {
            return None;
        }
        Some(Self::from_json_total(value))
    }

    fn from_json_total(value: &JsonValue) -> HostValue {
        match value {
            JsonValue::Null => HostValue::None,
            JsonValue::Bool(b) => HostValue::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    HostValue::Int(i)
                } else {
                    HostValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            JsonValue::String(s) => HostValue::Str(s.clone()),
            JsonValue::Array(items) => {
                if !items.is_empty() && items.iter().all(JsonValue::is_boolean) {
                    HostValue::BoolArray(
                        items.iter().filter_map(JsonValue::as_bool).collect(),
                    )
                } else if !items.is_empty() && items.iter().all(JsonValue::is_number) {
                    HostValue::FloatArray(
                        items.iter().filter_map(JsonValue::as_f64).collect(),
                    )
                } else {
                    HostValue::List(items.iter().map(Self::from_json_total).collect())
                }
            }
            JsonValue::Object(map) => HostValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json_total(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_classification() {
        assert_eq!(HostValue::Bool(true).kind(), Some(ValueKind::Bool));
        assert_eq!(HostValue::Int(3).kind(), Some(ValueKind::Int));
        assert_eq!(
            HostValue::FloatArray(vec![0.0; 3]).kind(),
            Some(ValueKind::Array {
                elem: ArrayElem::Float,
                len: 3
            })
        );
        assert_eq!(
            HostValue::CollectionRef("Cutters".into()).kind(),
            Some(ValueKind::Collection)
        );
        assert_eq!(HostValue::Opaque("Image".into()).kind(), None);
        assert_eq!(HostValue::None.kind(), None);
    }

    #[test]
    fn test_default_for() {
        assert_eq!(HostValue::default_for(&ValueKind::Bool), HostValue::Bool(false));
        assert_eq!(
            HostValue::default_for(&ValueKind::Array {
                elem: ArrayElem::Bool,
                len: 3
            }),
            HostValue::BoolArray(vec![false; 3])
        );
        assert_eq!(HostValue::default_for(&ValueKind::Object), HostValue::None);
        assert_eq!(
            HostValue::default_for(&ValueKind::ItemList),
            HostValue::Items(Vec::new())
        );
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(
            HostValue::from_json(&ValueKind::Int, &json!(7)),
            Some(HostValue::Int(7))
        );
        // Integer-valued floats truncate to ints, as the host would.
        assert_eq!(
            HostValue::from_json(&ValueKind::Int, &json!(7.9)),
            Some(HostValue::Int(7))
        );
        assert_eq!(
            HostValue::from_json(&ValueKind::Float, &json!(2)),
            Some(HostValue::Float(2.0))
        );
        assert_eq!(HostValue::from_json(&ValueKind::Bool, &json!("yes")), None);
    }

    #[test]
    fn test_from_json_arrays() {
        let kind = ValueKind::Array {
            elem: ArrayElem::Float,
            len: 3,
        };
        assert_eq!(
            HostValue::from_json(&kind, &json!([1.0, 2, 3.5])),
            Some(HostValue::FloatArray(vec![1.0, 2.0, 3.5]))
        );
        // Length mismatch passes through; the host rejects it on assignment.
        assert_eq!(
            HostValue::from_json(&kind, &json!([1.0, 2.0])),
            Some(HostValue::FloatArray(vec![1.0, 2.0]))
        );
        assert_eq!(HostValue::from_json(&kind, &json!([1.0, "x"])), None);

        let kind = ValueKind::Array {
            elem: ArrayElem::Bool,
            len: 3,
        };
        assert_eq!(
            HostValue::from_json(&kind, &json!([true, false, true])),
            Some(HostValue::BoolArray(vec![true, false, true]))
        );
    }

    #[test]
    fn test_from_json_flags_and_refs() {
        let flags = HostValue::from_json(&ValueKind::EnumFlags, &json!(["VERT", "EDGE"]));
        assert_eq!(
            flags,
            Some(HostValue::EnumSet(
                ["VERT", "EDGE"].iter().map(|s| s.to_string()).collect()
            ))
        );
        assert_eq!(
            HostValue::from_json(&ValueKind::Collection, &json!("Cutters")),
            Some(HostValue::CollectionRef("Cutters".into()))
        );
        assert_eq!(
            HostValue::from_json(&ValueKind::ItemList, &json!(["a", "b"])),
            Some(HostValue::Items(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_from_json_blind() {
        assert_eq!(HostValue::from_json_blind(&json!(null)), None);
        assert_eq!(
            HostValue::from_json_blind(&json!([1, 2.5, 3])),
            Some(HostValue::FloatArray(vec![1.0, 2.5, 3.0]))
        );
        assert_eq!(
            HostValue::from_json_blind(&json!([true, false])),
            Some(HostValue::BoolArray(vec![true, false]))
        );
        let mixed = HostValue::from_json_blind(&json!([1, "x"])).unwrap();
        assert!(matches!(mixed, HostValue::List(_)));
        let map = HostValue::from_json_blind(&json!({"a": 1})).unwrap();
        assert!(matches!(map, HostValue::Map(_)));
    }
}
