//! Route table loading errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Route table not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse route table: {0}")]
    Parse(String),

    #[error("Invalid route '{key}': {message}")]
    InvalidEdge { key: String, message: String },
}
