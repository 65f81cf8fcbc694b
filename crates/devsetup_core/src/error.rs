//! Error types for config resolution.

use std::path::PathBuf;
use thiserror::Error;

use devsetup_templates::TemplateError;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while resolving a setup run.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Schema violation at '{field}': {message}")]
    SchemaViolation { field: String, message: String },

    #[error("Unknown environment '{0}' (expected one of: ros.noetic, ros.humble, debian)")]
    UnknownEnvironment(String),

    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("No <name> element found in manifest {0}")]
    ManifestMissingName(PathBuf),

    #[error("Invalid manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("Confirmation failed: {0}")]
    Prompt(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the error means a required file is absent.
    pub fn is_missing_file(&self) -> bool {
        matches!(
            self,
            Self::ManifestNotFound(_) | Self::Template(TemplateError::MissingFile(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_detection() {
        assert!(CoreError::from(TemplateError::MissingFile(PathBuf::from("a.yml.j2"))).is_missing_file());
        assert!(CoreError::ManifestNotFound(PathBuf::from("package.xml")).is_missing_file());
        assert!(!CoreError::UnknownEnvironment("ros.kinetic".into()).is_missing_file());
    }
}
