//! Error types for the runtime crate.

use thiserror::Error;

/// Errors that abort a poll cycle or a scheduler operation.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Settings or posted-link log could not be read or written.
    #[error("persistence error: {0}")]
    Persistence(#[from] feedbot_persistence::PersistenceError),

    /// The poll task did not shut down cleanly.
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
