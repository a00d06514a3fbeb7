/*!
Preset persistence.

Storage is a port with pluggable adapters; the preset store is the engine
on top of it. The on-disk document is a JSON array of single-key records,
one record per preset slot:

```json
[
  { "Preset1": { "Preference": { ... }, "ModSet": [ ... ] } },
  { "Preset2": { "Preference": { ... }, "ModSet": [ ... ] } }
]
```

Records that are not objects are tolerated and ignored; when a slot occurs
more than once the first record wins. Saving replaces the slot's record in
place and leaves every other slot untouched.
*/

pub mod local;

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{ModsetError, Result};
use crate::preset::PresetSet;

pub use local::LocalFileStorage;

/// Storage abstraction for reading and writing the preset document
///
/// Implementations decide where the bytes live; the engine never touches
/// the filesystem directly.
pub trait StorageAdapter {
    /// Save document bytes to the specified location
    fn save(&self, data: &[u8], path: &str) -> Result<()>;

    /// Load document bytes from the specified location
    fn load(&self, path: &str) -> Result<Vec<u8>>;

    /// Check whether a document exists at the specified location
    fn exists(&self, path: &str) -> bool;

    /// Delete the document at the specified location
    fn delete(&self, path: &str) -> Result<()>;
}

/// Preset slot engine over a storage adapter.
pub struct PresetStore<S: StorageAdapter> {
    storage: S,
    path: String,
}

impl<S: StorageAdapter> PresetStore<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    /// Location of the preset document inside the adapter.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the preset document exists at all.
    pub fn exists(&self) -> bool {
        self.storage.exists(&self.path)
    }

    /// Read the raw document records. A missing file is an empty document;
    /// malformed content degrades to an empty document with a warning,
    /// while I/O failures propagate.
    fn read_document(&self) -> Result<Vec<JsonValue>> {
        if !self.storage.exists(&self.path) {
            return Ok(Vec::new());
        }
        let bytes = self.storage.load(&self.path)?;
        match serde_json::from_slice::<JsonValue>(&bytes) {
            Ok(JsonValue::Array(records)) => Ok(records),
            Ok(other) => {
                warn!(
                    path = %self.path,
                    "preset document is not a JSON array ({}), starting empty",
                    other
                );
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(path = %self.path, error = %err, "preset document is malformed, starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn write_document(&self, document: &[JsonValue]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        self.storage.save(&bytes, &self.path)
    }

    /// Load one slot. The first record carrying the slot wins.
    pub fn load(&self, slot: &str) -> Result<PresetSet> {
        debug!(path = %self.path, slot, "loading preset slot");
        for record in self.read_document()? {
            if let Some(payload) = record.as_object().and_then(|obj| obj.get(slot)) {
                return Ok(serde_json::from_value(payload.clone())?);
            }
        }
        Err(ModsetError::SlotNotFound(slot.to_string()))
    }

    /// Load one slot, or an empty set when the slot does not exist yet.
    pub fn load_or_default(&self, slot: &str) -> Result<PresetSet> {
        match self.load(slot) {
            Ok(set) => Ok(set),
            Err(ModsetError::SlotNotFound(_)) => Ok(PresetSet::default()),
            Err(err) => Err(err),
        }
    }

    /// Write one slot, replacing its record in place or appending a new
    /// record. Other slots in the document are preserved.
    pub fn save(&self, slot: &str, set: &PresetSet) -> Result<()> {
        debug!(path = %self.path, slot, entries = set.len(), "saving preset slot");
        let mut document = self.read_document()?;
        let payload = serde_json::to_value(set)?;

        let mut replaced = false;
        for record in document.iter_mut() {
            if let Some(obj) = record.as_object_mut() {
                if obj.contains_key(slot) {
                    obj.insert(slot.to_string(), payload.clone());
                    replaced = true;
                    break;
                }
            }
        }
        if !replaced {
            let mut record = serde_json::Map::new();
            record.insert(slot.to_string(), payload);
            document.push(JsonValue::Object(record));
        }
        self.write_document(&document)
    }

    /// Slot names present in the document, in record order.
    pub fn slots(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for record in self.read_document()? {
            if let Some(obj) = record.as_object() {
                for key in obj.keys() {
                    if !names.iter().any(|existing| existing == key) {
                        names.push(key.clone());
                    }
                }
            }
        }
        Ok(names)
    }

    /// Remove a slot from the document. Returns whether it was present.
    pub fn delete_slot(&self, slot: &str) -> Result<bool> {
        let mut document = self.read_document()?;
        let mut removed = false;
        for record in document.iter_mut() {
            if let Some(obj) = record.as_object_mut() {
                if obj.remove(slot).is_some() {
                    removed = true;
                }
            }
        }
        if !removed {
            return Ok(false);
        }
        document.retain(|record| record.as_object().map(|obj| !obj.is_empty()).unwrap_or(true));
        self.write_document(&document)?;
        Ok(true)
    }
}

/// Preset store over the local filesystem, honoring the given config.
pub fn create_default_store(config: &StoreConfig) -> PresetStore<LocalFileStorage> {
    PresetStore::new(
        LocalFileStorage::new(),
        config.prefs_path.to_string_lossy().into_owned(),
    )
}

/// Memory-based storage adapter for testing
///
/// Stores documents in a shared map so cloned handles observe the same
/// contents. Useful for unit testing without touching the filesystem.
#[cfg(test)]
#[derive(Clone)]
pub struct MemoryStorage {
    data: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>>,
}

#[cfg(test)]
impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            data: std::sync::Arc::new(std::sync::Mutex::new(std::collections::HashMap::new())),
        }
    }
}

#[cfg(test)]
impl StorageAdapter for MemoryStorage {
    fn save(&self, data: &[u8], path: &str) -> Result<()> {
        let mut storage = self.data.lock().unwrap();
        storage.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn load(&self, path: &str) -> Result<Vec<u8>> {
        let storage = self.data.lock().unwrap();
        storage
            .get(path)
            .cloned()
            .ok_or_else(|| ModsetError::storage(format!("Preset file not found: {path}")))
    }

    fn exists(&self, path: &str) -> bool {
        let storage = self.data.lock().unwrap();
        storage.contains_key(path)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let mut storage = self.data.lock().unwrap();
        storage.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{PresetEntry, PresetPrefs};

    fn store() -> (MemoryStorage, PresetStore<MemoryStorage>) {
        let storage = MemoryStorage::new();
        let store = PresetStore::new(storage.clone(), "prefs.json");
        (storage, store)
    }

    fn sample_set(name: &str) -> PresetSet {
        let mut set = PresetSet::default();
        set.push(PresetEntry {
            name: name.into(),
            kind: "BEVEL".into(),
            icon: "MOD_BEVEL".into(),
            parameters: r#"{"width":0.1}"#.into(),
            ..PresetEntry::default()
        });
        set
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_, store) = store();
        assert!(!store.exists());

        let set = sample_set("Bevel");
        store.save("Preset1", &set).unwrap();
        assert!(store.exists());

        let loaded = store.load("Preset1").unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_missing_slot() {
        let (_, store) = store();
        assert!(matches!(
            store.load("Preset1"),
            Err(ModsetError::SlotNotFound(_))
        ));
        let set = store.load_or_default("Preset1").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.preference, PresetPrefs::default());
    }

    #[test]
    fn test_save_replaces_slot_and_preserves_others() {
        let (_, store) = store();
        store.save("Preset1", &sample_set("One")).unwrap();
        store.save("Preset2", &sample_set("Two")).unwrap();
        store.save("Preset1", &sample_set("Replaced")).unwrap();

        assert_eq!(store.slots().unwrap(), vec!["Preset1", "Preset2"]);
        assert_eq!(store.load("Preset1").unwrap().entries[0].name, "Replaced");
        assert_eq!(store.load("Preset2").unwrap().entries[0].name, "Two");
    }

    #[test]
    fn test_first_record_wins_on_duplicates() {
        let (storage, store) = store();
        let document = serde_json::json!([
            {"Preset1": {"ModSet": [{"Name": "First", "Type": "BEVEL"}]}},
            {"Preset1": {"ModSet": [{"Name": "Second", "Type": "WELD"}]}}
        ]);
        storage
            .save(serde_json::to_vec(&document).unwrap().as_slice(), "prefs.json")
            .unwrap();

        assert_eq!(store.load("Preset1").unwrap().entries[0].name, "First");
    }

    #[test]
    fn test_junk_records_tolerated() {
        let (storage, store) = store();
        let document = serde_json::json!([
            42,
            "noise",
            {"Preset2": {"ModSet": []}}
        ]);
        storage
            .save(serde_json::to_vec(&document).unwrap().as_slice(), "prefs.json")
            .unwrap();

        assert_eq!(store.slots().unwrap(), vec!["Preset2"]);
        assert!(store.load("Preset2").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_starts_empty() {
        let (storage, store) = store();
        storage.save(b"{not json", "prefs.json").unwrap();

        assert!(store.slots().unwrap().is_empty());
        store.save("Preset1", &sample_set("Fresh")).unwrap();
        assert_eq!(store.load("Preset1").unwrap().entries[0].name, "Fresh");
    }

    #[test]
    fn test_delete_slot() {
        let (_, store) = store();
        store.save("Preset1", &sample_set("One")).unwrap();
        store.save("Preset2", &sample_set("Two")).unwrap();

        assert!(store.delete_slot("Preset1").unwrap());
        assert!(!store.delete_slot("Preset1").unwrap());
        assert_eq!(store.slots().unwrap(), vec!["Preset2"]);
        assert!(matches!(
            store.load("Preset1"),
            Err(ModsetError::SlotNotFound(_))
        ));
    }

    #[test]
    fn test_document_shape_on_disk() {
        let (storage, store) = store();
        store.save("Preset1", &sample_set("Bevel")).unwrap();

        let bytes = storage.load("prefs.json").unwrap();
        let document: JsonValue = serde_json::from_slice(&bytes).unwrap();
        let records = document.as_array().unwrap();
        assert_eq!(records.len(), 1);
        let slot = records[0].as_object().unwrap().get("Preset1").unwrap();
        assert!(slot.get("Preference").is_some());
        let entries = slot.get("ModSet").unwrap().as_array().unwrap();
        assert_eq!(entries[0]["Name"], "Bevel");
        assert_eq!(entries[0]["Parameters"], r#"{"width":0.1}"#);
    }
}
