/*!
Error types for the ModSet core engine.
*/

use std::fmt;

use thiserror::Error;

/// Result type used throughout the ModSet core.
pub type Result<T> = std::result::Result<T, ModsetError>;

/// Errors that can occur during preset operations.
#[derive(Error, Debug)]
pub enum ModsetError {
    /// I/O errors during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid preset document format
    #[error("Invalid preset format: {0}")]
    InvalidFormat(String),

    /// Modifier kind not present in the schema registry
    #[error("Unknown modifier kind: {0}")]
    UnknownKind(String),

    /// Requested preset slot does not exist in the document
    #[error("Preset slot not found: {0}")]
    SlotNotFound(String),

    /// Node group is not linked from an asset file and cannot be re-added by path
    #[error("Node group '{0}' is not linked from an asset library")]
    UnlinkedNodeGroup(String),

    /// Storage adapter errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ModsetError {
    /// Create a new storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new invalid format error
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

/// Per-property diagnostic accumulated while extracting or restoring.
///
/// A single bad property never aborts the surrounding operation; it is
/// recorded here and the remaining properties are still processed.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Property or socket key the failure belongs to
    pub field: String,
    /// What went wrong
    pub kind: FieldErrorKind,
}

/// The ways an individual property can fail to round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    /// The live value has no JSON-safe representation
    Unsupported { type_name: String },
    /// The snapshot key matches no property on the target
    UnknownField,
    /// The stored value does not fit the property's shape
    ShapeMismatch,
    /// A referenced entity is not present in the host scene
    UnresolvedReference { entity: String },
    /// The host rejected the assignment
    Rejected { reason: String },
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    pub fn unsupported(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(
            field,
            FieldErrorKind::Unsupported {
                type_name: type_name.into(),
            },
        )
    }

    pub fn unknown(field: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::UnknownField)
    }

    pub fn shape_mismatch(field: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::ShapeMismatch)
    }

    pub fn unresolved(field: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(
            field,
            FieldErrorKind::UnresolvedReference {
                entity: entity.into(),
            },
        )
    }

    pub fn rejected(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            field,
            FieldErrorKind::Rejected {
                reason: reason.into(),
            },
        )
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Unsupported { type_name } => {
                write!(f, "{}: unsupported value type {}", self.field, type_name)
            }
            FieldErrorKind::UnknownField => write!(f, "{}: no such property", self.field),
            FieldErrorKind::ShapeMismatch => {
                write!(f, "{}: value does not fit property shape", self.field)
            }
            FieldErrorKind::UnresolvedReference { entity } => {
                write!(f, "{}: referenced entity '{}' not found", self.field, entity)
            }
            FieldErrorKind::Rejected { reason } => {
                write!(f, "{}: assignment rejected ({})", self.field, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModsetError::storage("disk full");
        assert_eq!(err.to_string(), "Storage error: disk full");

        let err = ModsetError::UnknownKind("WARP".to_string());
        assert_eq!(err.to_string(), "Unknown modifier kind: WARP");

        let err = ModsetError::SlotNotFound("Preset9".to_string());
        assert_eq!(err.to_string(), "Preset slot not found: Preset9");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ModsetError = io_err.into();
        assert!(matches!(err, ModsetError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: ModsetError = json_err.into();
        assert!(matches!(err, ModsetError::Json(_)));
    }

    #[test]
    fn test_field_error_display() {
        let err = FieldError::unsupported("texture", "ImageHandle");
        assert_eq!(err.to_string(), "texture: unsupported value type ImageHandle");

        let err = FieldError::unknown("ghost_prop");
        assert_eq!(err.to_string(), "ghost_prop: no such property");

        let err = FieldError::unresolved("collection_name", "Bricks");
        assert_eq!(
            err.to_string(),
            "collection_name: referenced entity 'Bricks' not found"
        );

        let err = FieldError::rejected("relative_offset_displace", "expected 3 elements, got 2");
        assert_eq!(
            err.to_string(),
            "relative_offset_displace: assignment rejected (expected 3 elements, got 2)"
        );
    }
}
