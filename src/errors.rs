//! Error types for the lifenotes application.
//!
//! Store operations never fail; a missing id is a no-op. The variants here
//! cover bulk-import parsing, the blob store and the command-line layer.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the lifenotes application.
#[derive(Error, Debug)]
pub enum LnError {
    /// Bulk-import text is not valid JSON.
    #[error("invalid JSON: {message}")]
    Format { message: String },

    /// Bulk-import text parsed, but the top-level value is not an array.
    #[error("not an array: expected a JSON array, found {found}")]
    Shape { found: &'static str },

    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Launching or reading back from the external editor failed.
    #[error("{message}")]
    EditorError { message: String },

    /// A command-line argument could not be interpreted.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}
