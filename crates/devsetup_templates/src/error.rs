//! Error types for config and template handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while loading configs or rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Required file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Malformed config in {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Unresolved reference in template {template}: {message}")]
    UnresolvedReference { template: String, message: String },

    #[error("Template syntax error in {template}: {message}")]
    Syntax { template: String, message: String },

    #[error("Template rendering failed for {template}: {message}")]
    Rendering { template: String, message: String },

    #[error("Path segment {segment:?} of {path} rendered to an invalid name")]
    InvalidPathSegment { path: PathBuf, segment: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk template tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TemplateError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}
