/*!
Configuration for preset storage.
*/

use std::path::PathBuf;

use crate::error::{ModsetError, Result};

/// Hosts expose a fixed range of preset slots.
pub const MAX_SLOTS: usize = 3;

/// Default preset file location, relative to the working directory.
pub const DEFAULT_PREFS_FILE: &str = "assets/prefs.json";

/// Slot used when none is named.
pub const DEFAULT_SLOT: &str = "Preset1";

/// Where presets live and which slot to operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub prefs_path: PathBuf,
    pub slot: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefs_path: PathBuf::from(DEFAULT_PREFS_FILE),
            slot: DEFAULT_SLOT.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(prefs_path: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            prefs_path: prefs_path.into(),
            slot: slot.into(),
        }
    }

    /// Name of the slot at a fixed index, `Preset1` through `Preset3`.
    pub fn slot_name(index: usize) -> Result<String> {
        if index < MAX_SLOTS {
            Ok(format!("Preset{}", index + 1))
        } else {
            Err(ModsetError::validation(format!(
                "slot index {index} out of range, hosts expose {MAX_SLOTS} slots"
            )))
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot.is_empty() {
            return Err(ModsetError::validation("slot name cannot be empty"));
        }
        if self.prefs_path.as_os_str().is_empty() {
            return Err(ModsetError::validation("preset file path cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.prefs_path, PathBuf::from("assets/prefs.json"));
        assert_eq!(config.slot, "Preset1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slot_names() {
        assert_eq!(StoreConfig::slot_name(0).unwrap(), "Preset1");
        assert_eq!(StoreConfig::slot_name(2).unwrap(), "Preset3");
        assert!(StoreConfig::slot_name(3).is_err());
    }

    #[test]
    fn test_validation() {
        let config = StoreConfig::new("prefs.json", "");
        assert!(config.validate().is_err());
        let config = StoreConfig::new("", "Preset1");
        assert!(config.validate().is_err());
    }
}
