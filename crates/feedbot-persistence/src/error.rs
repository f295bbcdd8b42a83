//! Error types for the persistence crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing bot state files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Could not create a state directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not read a state file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a state file.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings record is not valid JSON or has the wrong shape.
    #[error("malformed settings record: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings record parsed but holds an unusable value.
    #[error("invalid settings record: {0}")]
    InvalidSettings(String),

    /// A link that cannot be stored in the line-oriented log.
    #[error("invalid link for posted log: {0:?}")]
    InvalidLink(String),
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
