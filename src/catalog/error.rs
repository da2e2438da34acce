//! Catalog loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a site catalog.
///
/// All of these surface at startup; a catalog that loads is safe to plan against.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Site '{site}' has malformed target range '{value}': {reason}")]
    InvalidRange {
        site: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{owner} references unknown {kind} '{id}'")]
    UnknownReference {
        owner: String,
        kind: &'static str,
        id: String,
    },

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}
