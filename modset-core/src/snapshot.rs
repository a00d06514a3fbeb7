/*!
Parameter snapshots.

A snapshot is a flat JSON object mapping property keys to JSON-safe values.
Preset files embed snapshots as compact JSON strings; decoding one is fatal
only to the restore that needed it, so the lossy decoder degrades to an
empty snapshot instead of failing the surrounding operation.
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::error::{ModsetError, Result};

/// Dedicated snapshot key holding a modifier's collection reference by name.
pub const COLLECTION_KEY: &str = "collection_name";

/// Prefix marking a stored string as an object reference by name.
pub const OBJECT_MARKER_PREFIX: &str = "OBJ:";

/// Encode an object name as a marker string.
pub fn object_marker(name: &str) -> String {
    format!("{OBJECT_MARKER_PREFIX}{name}")
}

/// The object name inside a marker string, if the string is one.
pub fn parse_object_marker(text: &str) -> Option<&str> {
    text.strip_prefix(OBJECT_MARKER_PREFIX)
}

/// JSON-safe capture of a modifier's parameter values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSnapshot(Map<String, JsonValue>);

impl ParameterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    /// Compact JSON encoding, the form preset files embed.
    pub fn to_json(&self) -> String {
        JsonValue::Object(self.0.clone()).to_string()
    }

    /// Strict decoding; the input must be a JSON object.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)?;
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(ModsetError::invalid_format(format!(
                "parameters must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Decoding that degrades to an empty snapshot on malformed input.
    pub fn from_json_lossy(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "parameters failed to decode, restoring nothing");
                Self::new()
            }
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

impl FromIterator<(String, JsonValue)> for ParameterSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
