/*!
Preset records and display preferences.

A preset entry is one saved modifier configuration: identity and display
fields plus the parameter snapshot embedded as a compact JSON string. The
on-disk field names are fixed by the preset file schema and do not follow
Rust naming.
*/

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{ModsetError, Result};
use crate::extract::{extract_modifier, extract_node_sockets, CodecOptions};
use crate::host::{NodesModifier, PropertyStore};
use crate::icons::{icon_for, GEOMETRY_NODES_ICON};
use crate::schema::SchemaRegistry;
use crate::snapshot::ParameterSnapshot;

/// Modifier kind identifier for geometry-node presets.
pub const NODES_KIND: &str = "NODES";

/// Duplicate suffixes are cut from display names at the first dot.
fn display_name(raw: &str) -> &str {
    match raw.find('.') {
        Some(dot) => &raw[..dot],
        None => raw,
    }
}

fn de_parameters<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    // Older files stored the snapshot as an embedded object instead of an
    // encoded string; both forms are accepted.
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::String(text) => text,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    })
}

/// One saved modifier configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetEntry {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Icon", default)]
    pub icon: String,
    /// Asset path a node group is re-added from; empty for standard kinds
    #[serde(rename = "Path", default)]
    pub path: String,
    #[serde(rename = "AssetLibrary", default)]
    pub asset_library: String,
    /// Parameter snapshot as a compact JSON string; empty when nothing was
    /// captured
    #[serde(rename = "Parameters", default, deserialize_with = "de_parameters")]
    pub parameters: String,
}

impl PresetEntry {
    /// Capture a standard modifier into a preset entry.
    pub fn capture(
        modifier: &impl PropertyStore,
        registry: &SchemaRegistry,
        options: &CodecOptions,
    ) -> Result<PresetEntry> {
        let report = extract_modifier(modifier, registry, options)?;
        let kind = modifier.kind().to_string();
        Ok(PresetEntry {
            name: display_name(modifier.name()).to_string(),
            icon: icon_for(&kind).to_string(),
            kind,
            path: String::new(),
            asset_library: String::new(),
            parameters: report.snapshot.to_json(),
        })
    }

    /// Capture a geometry-node modifier into a preset entry.
    ///
    /// Only groups linked from an asset file can be re-added by path, so a
    /// file-local or missing group refuses the capture.
    pub fn capture_nodes(modifier: &NodesModifier, options: &CodecOptions) -> Result<PresetEntry> {
        let group = modifier
            .node_group
            .as_ref()
            .ok_or_else(|| ModsetError::UnlinkedNodeGroup(modifier.name.clone()))?;
        let Some(asset_path) = group.asset_path.as_deref() else {
            return Err(ModsetError::UnlinkedNodeGroup(group.name.clone()));
        };
        let report = extract_node_sockets(modifier, options);
        let parameters = if report.snapshot.is_empty() {
            String::new()
        } else {
            report.snapshot.to_json()
        };
        let file_name = std::path::Path::new(asset_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(asset_path);
        Ok(PresetEntry {
            name: display_name(&modifier.name).to_string(),
            kind: NODES_KIND.to_string(),
            icon: GEOMETRY_NODES_ICON.to_string(),
            path: format!("{file_name}/NodeTree/{}", group.name),
            asset_library: group.library.clone().unwrap_or_default(),
            parameters,
        })
    }

    /// Whether this entry re-adds a node group by asset path.
    pub fn is_node_preset(&self) -> bool {
        !self.path.is_empty()
    }

    /// Decode the embedded snapshot; malformed or missing parameters yield
    /// an empty one.
    pub fn snapshot(&self) -> ParameterSnapshot {
        if self.parameters.is_empty() {
            ParameterSnapshot::new()
        } else {
            ParameterSnapshot::from_json_lossy(&self.parameters)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.kind.is_empty() && self.path.is_empty() {
            return Err(ModsetError::validation(
                "preset entry carries neither a modifier kind nor a node path",
            ));
        }
        Ok(())
    }
}

pub const MIN_COLUMNS: u32 = 1;
pub const MAX_COLUMNS: u32 = 10;

fn default_column_number() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

fn de_column_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u32::deserialize(deserializer)?;
    Ok(value.clamp(MIN_COLUMNS, MAX_COLUMNS))
}

/// Display preferences stored alongside each preset slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetPrefs {
    #[serde(default = "default_column_number", deserialize_with = "de_column_number")]
    pub column_number: u32,
    #[serde(default)]
    pub show_mod_icon: bool,
    #[serde(default = "default_true")]
    pub show_mod_name: bool,
    #[serde(default)]
    pub show_preset: bool,
}

impl Default for PresetPrefs {
    fn default() -> Self {
        Self {
            column_number: default_column_number(),
            show_mod_icon: false,
            show_mod_name: true,
            show_preset: false,
        }
    }
}

impl PresetPrefs {
    /// Set the grid column count, clamped to the valid range.
    pub fn set_column_number(&mut self, columns: u32) {
        self.column_number = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
    }
}

/// Everything one preset slot holds: preferences plus the ordered entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetSet {
    #[serde(rename = "Preference", default)]
    pub preference: PresetPrefs,
    #[serde(rename = "ModSet", default)]
    pub entries: Vec<PresetEntry>,
}

impl PresetSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: PresetEntry) {
        self.entries.push(entry);
    }

    /// Insert directly after `index`, appending when the index is out of
    /// range.
    pub fn insert_after(&mut self, index: usize, entry: PresetEntry) {
        let at = (index + 1).min(self.entries.len());
        self.entries.insert(at, entry);
    }

    /// Swap the entry at `index` with its neighbor `offset` positions away.
    /// Out-of-range moves are ignored and reported as such.
    pub fn swap_with_offset(&mut self, index: usize, offset: isize) -> bool {
        let Some(target) = index.checked_add_signed(offset) else {
            return false;
        };
        if index >= self.entries.len() || target >= self.entries.len() {
            return false;
        }
        self.entries.swap(index, target);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<PresetEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Modifier, NodeGroupRef};
    use crate::value::HostValue;
    use serde_json::json;

    #[test]
    fn test_entry_serializes_with_schema_field_names() {
        let entry = PresetEntry {
            name: "Bevel".into(),
            kind: "BEVEL".into(),
            icon: "MOD_BEVEL".into(),
            path: String::new(),
            asset_library: String::new(),
            parameters: r#"{"width":0.1}"#.into(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        for key in ["Name", "Type", "Icon", "Path", "AssetLibrary", "Parameters"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["Type"], json!("BEVEL"));
    }

    #[test]
    fn test_parameters_accepts_string_or_object() {
        let entry: PresetEntry =
            serde_json::from_value(json!({"Name": "A", "Parameters": {"count": 3}})).unwrap();
        assert_eq!(entry.parameters, r#"{"count":3}"#);

        let entry: PresetEntry =
            serde_json::from_value(json!({"Name": "A", "Parameters": "{\"count\":3}"})).unwrap();
        assert_eq!(entry.snapshot().get("count"), Some(&json!(3)));

        let entry: PresetEntry = serde_json::from_value(json!({"Name": "A"})).unwrap();
        assert!(entry.parameters.is_empty());
        assert!(entry.snapshot().is_empty());
    }

    #[test]
    fn test_prefs_defaults_and_clamping() {
        let prefs: PresetPrefs = serde_json::from_value(json!({})).unwrap();
        assert_eq!(prefs, PresetPrefs::default());
        assert_eq!(prefs.column_number, 2);
        assert!(prefs.show_mod_name);
        assert!(!prefs.show_mod_icon);
        assert!(!prefs.show_preset);

        let prefs: PresetPrefs = serde_json::from_value(json!({"column_number": 99})).unwrap();
        assert_eq!(prefs.column_number, MAX_COLUMNS);
        let prefs: PresetPrefs = serde_json::from_value(json!({"column_number": 0})).unwrap();
        assert_eq!(prefs.column_number, MIN_COLUMNS);

        let mut prefs = PresetPrefs::default();
        prefs.set_column_number(50);
        assert_eq!(prefs.column_number, MAX_COLUMNS);
    }

    #[test]
    fn test_capture_truncates_duplicate_suffix() {
        let mut modifier =
            Modifier::with_defaults("Bevel.001", "BEVEL", SchemaRegistry::builtin()).unwrap();
        modifier.insert("width", HostValue::Float(0.25));
        modifier.insert("segments", HostValue::Int(3));
        let entry =
            PresetEntry::capture(&modifier, SchemaRegistry::builtin(), &CodecOptions::default())
                .unwrap();
        assert_eq!(entry.name, "Bevel");
        assert_eq!(entry.kind, "BEVEL");
        assert_eq!(entry.icon, "MOD_BEVEL");
        assert!(!entry.is_node_preset());
        assert_eq!(entry.snapshot().get("width"), Some(&json!(0.25)));
        assert_eq!(entry.snapshot().get("segments"), Some(&json!(3)));
    }

    #[test]
    fn test_capture_nodes_requires_asset_link() {
        let mut gn = NodesModifier::new("Scatter.002");
        let err = PresetEntry::capture_nodes(&gn, &CodecOptions::default()).unwrap_err();
        assert!(matches!(err, ModsetError::UnlinkedNodeGroup(_)));

        gn.node_group = Some(NodeGroupRef::local("Rock Scatter"));
        let err = PresetEntry::capture_nodes(&gn, &CodecOptions::default()).unwrap_err();
        assert!(matches!(err, ModsetError::UnlinkedNodeGroup(_)));

        gn.node_group = Some(NodeGroupRef::asset(
            "Rock Scatter",
            "libraries/scatter.blend",
            Some("User Library".into()),
        ));
        gn.insert_socket("Input_2", HostValue::Float(0.5));
        let entry = PresetEntry::capture_nodes(&gn, &CodecOptions::default()).unwrap();
        assert_eq!(entry.name, "Scatter");
        assert_eq!(entry.kind, NODES_KIND);
        assert_eq!(entry.icon, GEOMETRY_NODES_ICON);
        assert_eq!(entry.path, "scatter.blend/NodeTree/Rock Scatter");
        assert_eq!(entry.asset_library, "User Library");
        assert!(entry.is_node_preset());
        assert_eq!(entry.snapshot().get("Input_2"), Some(&json!(0.5)));
    }

    #[test]
    fn test_capture_nodes_without_sockets_stores_empty_parameters() {
        let mut gn = NodesModifier::new("Plain");
        gn.node_group = Some(NodeGroupRef::asset("Plain Group", "lib.blend", None));
        let entry = PresetEntry::capture_nodes(&gn, &CodecOptions::default()).unwrap();
        assert!(entry.parameters.is_empty());
        assert!(entry.asset_library.is_empty());
    }

    #[test]
    fn test_validate() {
        let mut entry = PresetEntry::default();
        assert!(entry.validate().is_err());
        entry.kind = "BEVEL".into();
        assert!(entry.validate().is_ok());
    }

    fn named(name: &str) -> PresetEntry {
        PresetEntry {
            name: name.into(),
            kind: "BEVEL".into(),
            ..PresetEntry::default()
        }
    }

    #[test]
    fn test_set_ordering_operations() {
        let mut set = PresetSet::default();
        set.push(named("a"));
        set.push(named("b"));
        set.push(named("c"));

        set.insert_after(0, named("x"));
        let names: Vec<_> = set.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "x", "b", "c"]);

        set.insert_after(99, named("y"));
        assert_eq!(set.entries.last().unwrap().name, "y");

        assert!(set.swap_with_offset(0, 1));
        assert_eq!(set.entries[0].name, "x");
        assert_eq!(set.entries[1].name, "a");

        assert!(!set.swap_with_offset(0, -1));
        assert!(!set.swap_with_offset(4, 1));
        assert!(!set.swap_with_offset(17, 1));

        assert_eq!(set.remove(1).unwrap().name, "a");
        assert!(set.remove(99).is_none());
        assert_eq!(set.len(), 4);
    }
}
