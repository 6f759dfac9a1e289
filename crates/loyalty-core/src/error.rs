//! Core error types for loyalty-core.
//!
//! Identity errors (`AlreadyRegistered`, `InvalidCredentials`) are recoverable
//! by design: the engine turns them into rejection events at its boundary
//! instead of aborting. Storage errors are non-fatal as well -- a failed write
//! surfaces as a `StorageWriteFailed` event and the in-memory state stands.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for loyalty-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An account with this email already exists in the directory.
    #[error("email already registered: {email}")]
    AlreadyRegistered { email: String },

    /// No account matches the supplied email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A quest event referenced a step outside {pick, request, call}.
    #[error("unknown quest step: {0}")]
    UnknownQuestStep(String),

    /// Storage-related errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a backing file
    #[error("failed to read store at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a backing file
    #[error("failed to write store at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization of a payload failed
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
