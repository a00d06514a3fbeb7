/*!
Parameter extraction.

One extraction core, two ways of enumerating fields: standard modifiers walk
their kind's schema, geometry-node modifiers walk the live socket map and
keep keys matching the host's interface naming convention. Extraction never
fails per property; each field that cannot be represented is skipped and
reported, and everything else still lands in the snapshot.
*/

use serde_json::{Number, Value as JsonValue};
use tracing::{debug, warn};

use crate::error::{FieldError, ModsetError, Result};
use crate::host::{NodesModifier, PropertyStore};
use crate::normalize::{normalize, round_floats};
use crate::schema::{is_excluded, SchemaRegistry};
use crate::snapshot::{object_marker, ParameterSnapshot, COLLECTION_KEY};
use crate::value::{ArrayElem, HostValue, ValueKind};

/// How float socket values are written into snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatPrecision {
    /// Keep full precision
    #[default]
    Full,
    /// Round to four decimal places
    Round4,
}

/// What happens to object references during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectRefPolicy {
    /// Omit the property from the snapshot
    #[default]
    Drop,
    /// Store the object name as an `OBJ:` marker string
    Marker,
}

/// Knobs shared by both extraction paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecOptions {
    /// Applies to node-socket extraction; schema-driven floats are always
    /// stored at full precision
    pub float_precision: FloatPrecision,
    pub object_refs: ObjectRefPolicy,
}

/// Outcome of one extraction: the snapshot plus every field it had to drop.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub snapshot: ParameterSnapshot,
    pub dropped: Vec<FieldError>,
}

impl ExtractReport {
    fn empty() -> Self {
        Self {
            snapshot: ParameterSnapshot::new(),
            dropped: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

fn drop_field(dropped: &mut Vec<FieldError>, error: FieldError) {
    warn!(field = %error.field, "skipping field: {error}");
    dropped.push(error);
}

fn scalar_float(name: &str, value: f64, dropped: &mut Vec<FieldError>) -> Option<JsonValue> {
    match Number::from_f64(value) {
        Some(n) => Some(JsonValue::Number(n)),
        None => {
            drop_field(dropped, FieldError::unsupported(name, "non-finite float"));
            None
        }
    }
}

/// Capture a standard modifier's parameters against its registered schema.
///
/// Read-only, transient and excluded properties are skipped. A collection
/// reference lands under the dedicated `collection_name` key as the entity
/// name; object references follow the configured policy.
pub fn extract_modifier(
    modifier: &impl PropertyStore,
    registry: &SchemaRegistry,
    options: &CodecOptions,
) -> Result<ExtractReport> {
    let kind = modifier.kind();
    let schema = registry
        .schema(kind)
        .ok_or_else(|| ModsetError::UnknownKind(kind.to_string()))?;
    debug!(kind, "extracting modifier parameters");

    let mut report = ExtractReport::empty();
    for descriptor in schema.properties() {
        let name = descriptor.name.as_str();
        if descriptor.read_only || descriptor.transient || is_excluded(name) {
            continue;
        }
        let Some(value) = modifier.get(name) else {
            debug!(field = name, "property missing on live object, skipping");
            continue;
        };
        if let HostValue::Opaque(type_name) = &value {
            drop_field(
                &mut report.dropped,
                FieldError::unsupported(name, type_name.clone()),
            );
            continue;
        }
        match (&descriptor.kind, &value) {
            (ValueKind::Collection, HostValue::CollectionRef(target)) => {
                report.snapshot.insert(COLLECTION_KEY, JsonValue::String(target.clone()));
            }
            (ValueKind::Collection, HostValue::None) => {}
            (ValueKind::Object, HostValue::ObjectRef(target)) => {
                if options.object_refs == ObjectRefPolicy::Marker {
                    report
                        .snapshot
                        .insert(name, JsonValue::String(object_marker(target)));
                }
            }
            (ValueKind::Object, HostValue::None) => {}
            (ValueKind::Array { elem: ArrayElem::Bool, .. }, HostValue::BoolArray(_))
            | (ValueKind::Array { elem: ArrayElem::Int, .. }, HostValue::IntArray(_))
            | (ValueKind::Array { elem: ArrayElem::Float, .. }, HostValue::FloatArray(_))
            | (ValueKind::Array { elem: ArrayElem::Float, .. }, HostValue::Vector(_)) => {
                report.snapshot.insert(name, normalize(&value));
            }
            (ValueKind::ItemList, HostValue::Items(names)) => {
                // An empty nested collection leaves no key behind.
                if !names.is_empty() {
                    report.snapshot.insert(
                        name,
                        JsonValue::Array(
                            names.iter().cloned().map(JsonValue::String).collect(),
                        ),
                    );
                }
            }
            (ValueKind::EnumFlags, HostValue::EnumSet(_)) => {
                report.snapshot.insert(name, normalize(&value));
            }
            (ValueKind::Bool, HostValue::Bool(b)) => {
                report.snapshot.insert(name, JsonValue::Bool(*b));
            }
            (ValueKind::Int, HostValue::Int(i)) => {
                report.snapshot.insert(name, JsonValue::from(*i));
            }
            (ValueKind::Float, HostValue::Float(f)) => {
                if let Some(number) = scalar_float(name, *f, &mut report.dropped) {
                    report.snapshot.insert(name, number);
                }
            }
            (ValueKind::Str, HostValue::Str(s)) => {
                report.snapshot.insert(name, JsonValue::String(s.clone()));
            }
            _ => {
                drop_field(&mut report.dropped, FieldError::shape_mismatch(name));
            }
        }
    }
    debug!(
        kind,
        captured = report.snapshot.len(),
        dropped = report.dropped.len(),
        "extraction finished"
    );
    Ok(report)
}

fn is_captured_socket(key: &str) -> bool {
    (key.starts_with("Input_") || key.starts_with("Socket_"))
        && !key.ends_with("_use_attribute")
        && !key.ends_with("_attribute_name")
}

/// Capture a geometry-node modifier's socket values.
///
/// Only keys following the interface naming convention are considered.
/// Collection references are stored as their name under the original key;
/// object references are always dropped; everything else goes through the
/// recursive normalizer.
pub fn extract_node_sockets(modifier: &NodesModifier, options: &CodecOptions) -> ExtractReport {
    let mut report = ExtractReport::empty();
    let Some(group) = &modifier.node_group else {
        debug!(modifier = %modifier.name, "no node group assigned, nothing to capture");
        return report;
    };
    debug!(modifier = %modifier.name, group = %group.name, "extracting socket values");

    for (key, value) in modifier.sockets() {
        if !is_captured_socket(key) {
            continue;
        }
        match value {
            HostValue::CollectionRef(target) => {
                report.snapshot.insert(key.clone(), JsonValue::String(target.clone()));
            }
            HostValue::ObjectRef(_) => {}
            HostValue::Opaque(type_name) => {
                drop_field(
                    &mut report.dropped,
                    FieldError::unsupported(key.clone(), type_name.clone()),
                );
            }
            HostValue::None => {
                drop_field(
                    &mut report.dropped,
                    FieldError::unsupported(key.clone(), "none"),
                );
            }
            other => {
                let mut stored = normalize(other);
                if options.float_precision == FloatPrecision::Round4 {
                    round_floats(&mut stored, 4);
                }
                report.snapshot.insert(key.clone(), stored);
            }
        }
    }
    debug!(
        captured = report.snapshot.len(),
        dropped = report.dropped.len(),
        "socket extraction finished"
    );
    report
}
