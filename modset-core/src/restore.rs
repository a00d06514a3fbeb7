/*!
Parameter restoration.

Both restore paths mutate the target in place and tolerate every per-field
failure: an unknown key, a value that no longer fits or a reference that no
longer resolves skips that field, reports it and moves on. A snapshot never
has to match the target exactly to be useful.
*/

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{FieldError, ModsetError, Result};
use crate::host::{EntityRegistry, NodesModifier, PropertyStore};
use crate::schema::{KindSchema, SchemaRegistry};
use crate::snapshot::{parse_object_marker, ParameterSnapshot, COLLECTION_KEY};
use crate::value::{HostValue, ValueKind};

/// Outcome of one restore: which keys were written, which were skipped.
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    pub applied: Vec<String>,
    pub skipped: Vec<FieldError>,
}

impl RestoreReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn apply(&mut self, key: &str) {
        self.applied.push(key.to_string());
    }

    fn skip(&mut self, error: FieldError) {
        warn!(field = %error.field, "skipping field: {error}");
        self.skipped.push(error);
    }
}

fn restore_collection_key(
    modifier: &mut impl PropertyStore,
    schema: &KindSchema,
    value: &JsonValue,
    entities: &EntityRegistry,
    report: &mut RestoreReport,
) {
    let Some(name) = value.as_str() else {
        report.skip(FieldError::shape_mismatch(COLLECTION_KEY));
        return;
    };
    let Some(descriptor) = schema.collection_property() else {
        report.skip(FieldError::rejected(
            COLLECTION_KEY,
            "kind has no collection property",
        ));
        return;
    };
    if !entities.has_collection(name) {
        report.skip(FieldError::unresolved(COLLECTION_KEY, name));
        return;
    }
    match modifier.set(&descriptor.name, HostValue::CollectionRef(name.to_string())) {
        Ok(()) => report.apply(COLLECTION_KEY),
        Err(reason) => report.skip(FieldError::rejected(COLLECTION_KEY, reason)),
    }
}

/// Write a snapshot back onto a standard modifier of a registered kind.
///
/// The dedicated `collection_name` key resolves against the scene's
/// collections and lands on the kind's collection-reference property.
/// Every other key is looked up in the schema and coerced per its
/// descriptor; enum-flag sets are intersected with the currently valid
/// options before assignment.
pub fn restore_modifier(
    modifier: &mut impl PropertyStore,
    snapshot: &ParameterSnapshot,
    registry: &SchemaRegistry,
    entities: &EntityRegistry,
) -> Result<RestoreReport> {
    let kind = modifier.kind().to_string();
    let schema = registry
        .schema(&kind)
        .ok_or_else(|| ModsetError::UnknownKind(kind.clone()))?;
    debug!(kind = %kind, fields = snapshot.len(), "restoring modifier parameters");

    let mut report = RestoreReport::default();
    if let Some(value) = snapshot.get(COLLECTION_KEY) {
        restore_collection_key(modifier, schema, value, entities, &mut report);
    }

    for (key, value) in snapshot.iter() {
        if key == COLLECTION_KEY {
            continue;
        }
        let Some(descriptor) = schema.descriptor(key) else {
            report.skip(FieldError::unknown(key.clone()));
            continue;
        };
        match descriptor.kind {
            ValueKind::Object => {
                let Some(text) = value.as_str() else {
                    report.skip(FieldError::shape_mismatch(key.clone()));
                    continue;
                };
                let name = parse_object_marker(text).unwrap_or(text);
                if !entities.has_object(name) {
                    report.skip(FieldError::unresolved(key.clone(), name));
                    continue;
                }
                match modifier.set(key, HostValue::ObjectRef(name.to_string())) {
                    Ok(()) => report.apply(key),
                    Err(reason) => report.skip(FieldError::rejected(key.clone(), reason)),
                }
            }
            ValueKind::Collection => {
                let Some(name) = value.as_str() else {
                    report.skip(FieldError::shape_mismatch(key.clone()));
                    continue;
                };
                if !entities.has_collection(name) {
                    report.skip(FieldError::unresolved(key.clone(), name));
                    continue;
                }
                match modifier.set(key, HostValue::CollectionRef(name.to_string())) {
                    Ok(()) => report.apply(key),
                    Err(reason) => report.skip(FieldError::rejected(key.clone(), reason)),
                }
            }
            ValueKind::EnumFlags => {
                let Some(HostValue::EnumSet(mut flags)) =
                    HostValue::from_json(&descriptor.kind, value)
                else {
                    report.skip(FieldError::shape_mismatch(key.clone()));
                    continue;
                };
                // Identifiers the current schema no longer offers are
                // silently discarded.
                if !descriptor.options.is_empty() {
                    flags.retain(|flag| descriptor.options.contains(flag));
                }
                match modifier.set(key, HostValue::EnumSet(flags)) {
                    Ok(()) => report.apply(key),
                    Err(reason) => report.skip(FieldError::rejected(key.clone(), reason)),
                }
            }
            _ => {
                let Some(coerced) = HostValue::from_json(&descriptor.kind, value) else {
                    report.skip(FieldError::shape_mismatch(key.clone()));
                    continue;
                };
                match modifier.set(key, coerced) {
                    Ok(()) => report.apply(key),
                    Err(reason) => report.skip(FieldError::rejected(key.clone(), reason)),
                }
            }
        }
    }
    debug!(
        kind = %kind,
        applied = report.applied_count(),
        skipped = report.skipped.len(),
        "restore finished"
    );
    Ok(report)
}

fn restore_socket_string(
    modifier: &mut NodesModifier,
    key: &str,
    text: &str,
    entities: &EntityRegistry,
) -> std::result::Result<(), FieldError> {
    if entities.has_collection(text)
        && modifier
            .set_socket(key, HostValue::CollectionRef(text.to_string()))
            .is_ok()
    {
        return Ok(());
    }
    if let Some(object_name) = parse_object_marker(text) {
        if !entities.has_object(object_name) {
            return Err(FieldError::unresolved(key, object_name));
        }
        if modifier
            .set_socket(key, HostValue::ObjectRef(object_name.to_string()))
            .is_ok()
        {
            return Ok(());
        }
        return modifier
            .set_socket(key, HostValue::Str(text.to_string()))
            .map_err(|reason| FieldError::rejected(key, reason));
    }
    // Numeric-looking strings repair sockets that expect numbers.
    if text.contains('.') {
        if let Ok(f) = text.parse::<f64>() {
            if modifier.set_socket(key, HostValue::Float(f)).is_ok() {
                return Ok(());
            }
        }
    } else if let Ok(i) = text.parse::<i64>() {
        if modifier.set_socket(key, HostValue::Int(i)).is_ok() {
            return Ok(());
        }
    }
    modifier
        .set_socket(key, HostValue::Str(text.to_string()))
        .map_err(|reason| FieldError::rejected(key, reason))
}

/// Write a snapshot back onto a geometry-node modifier's sockets.
///
/// Keys the socket map does not carry are skipped. String values resolve
/// in order: scene collection, object marker, numeric-looking string,
/// plain string. When at least one socket was written, viewport
/// visibility is toggled off and back on so the host recomputes the
/// modifier's output.
pub fn restore_node_sockets(
    modifier: &mut NodesModifier,
    snapshot: &ParameterSnapshot,
    entities: &EntityRegistry,
) -> RestoreReport {
    debug!(modifier = %modifier.name, fields = snapshot.len(), "restoring socket values");
    let mut report = RestoreReport::default();

    for (key, value) in snapshot.iter() {
        if !modifier.contains_key(key) {
            report.skip(FieldError::unknown(key.clone()));
            continue;
        }
        match value {
            JsonValue::Null => {
                debug!(field = %key, "null socket value, leaving socket untouched");
            }
            JsonValue::String(text) => {
                match restore_socket_string(modifier, key, text, entities) {
                    Ok(()) => report.apply(key),
                    Err(error) => report.skip(error),
                }
            }
            other => {
                let Some(coerced) = HostValue::from_json_blind(other) else {
                    report.skip(FieldError::shape_mismatch(key.clone()));
                    continue;
                };
                match modifier.set_socket(key, coerced) {
                    Ok(()) => report.apply(key),
                    Err(reason) => report.skip(FieldError::rejected(key.clone(), reason)),
                }
            }
        }
    }

    if report.applied_count() > 0 {
        modifier.set_show_viewport(false);
        modifier.set_show_viewport(true);
    }
    debug!(
        applied = report.applied_count(),
        skipped = report.skipped.len(),
        "socket restore finished"
    );
    report
}
