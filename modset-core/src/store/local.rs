/*!
Local filesystem storage adapter implementation.
*/

use std::fs;
use std::path::{Path, PathBuf};

use super::StorageAdapter;
use crate::{ModsetError, Result};

/// Local filesystem storage adapter
///
/// Stores preset documents as files on the local filesystem and creates
/// missing parent directories on save.
///
/// # Example
/// ```no_run
/// use modset_core::store::{LocalFileStorage, StorageAdapter};
///
/// let storage = LocalFileStorage::new();
/// storage.save(b"[]", "assets/prefs.json")?;
/// # Ok::<(), modset_core::ModsetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    /// Optional base directory for all preset files
    base_dir: Option<PathBuf>,
}

impl LocalFileStorage {
    /// Create a new local file storage adapter without a base directory
    ///
    /// Paths provided to save/load will be used as-is.
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Create a new local file storage adapter with a base directory
    ///
    /// All paths will be resolved relative to the base directory.
    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: Some(base_dir.as_ref().to_path_buf()),
        }
    }

    /// Resolve the full path for a given storage path
    fn resolve_path(&self, path: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        }
    }

    /// Ensure the parent directory exists, creating it if necessary
    fn ensure_parent_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ModsetError::storage(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }
}

impl Default for LocalFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageAdapter for LocalFileStorage {
    fn save(&self, data: &[u8], path: &str) -> Result<()> {
        let full_path = self.resolve_path(path);

        self.ensure_parent_dir(&full_path)?;

        fs::write(&full_path, data).map_err(|e| {
            ModsetError::storage(format!(
                "Failed to write preset file {}: {}",
                full_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    fn load(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve_path(path);

        fs::read(&full_path).map_err(|e| {
            ModsetError::storage(format!(
                "Failed to read preset file {}: {}",
                full_path.display(),
                e
            ))
        })
    }

    fn exists(&self, path: &str) -> bool {
        let full_path = self.resolve_path(path);
        full_path.exists()
    }

    fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.resolve_path(path);

        if full_path.exists() {
            fs::remove_file(&full_path).map_err(|e| {
                ModsetError::storage(format!(
                    "Failed to delete preset file {}: {}",
                    full_path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::with_base_dir(temp_dir.path());

        let data = br#"[{"Preset1":{"ModSet":[]}}]"#;
        let path = "prefs.json";

        assert!(storage.save(data, path).is_ok());
        assert!(storage.exists(path));

        let loaded = storage.load(path).unwrap();
        assert_eq!(loaded, data);

        assert!(storage.delete(path).is_ok());
        assert!(!storage.exists(path));
        // Deleting again is a no-op.
        assert!(storage.delete(path).is_ok());
    }

    #[test]
    fn test_nested_directories_created() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::with_base_dir(temp_dir.path());

        let path = "assets/presets/prefs.json";
        assert!(storage.save(b"[]", path).is_ok());
        assert!(storage.exists(path));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::with_base_dir(temp_dir.path());

        let result = storage.load("nonexistent.json");

        // Filesystem failures are reported as storage errors, not raw I/O.
        if let Err(ModsetError::Storage(msg)) = result {
            assert!(msg.contains("nonexistent.json"));
        } else {
            panic!("Expected storage error for missing file");
        }
    }
}
