//! Core Error Types
//!
//! Defines the foundational error types used across the Social Canvas
//! workspace. These error types are dependency-free (only thiserror + std)
//! to keep the core crate lightweight.
//!
//! Validation outcomes that a caller is expected to recover from (unmet
//! dependency, content too short) are normally returned as structured data
//! by the canvas services, not as these errors. The variants below exist for
//! the places where an operation cannot produce a result at all: unknown
//! tool names, malformed tool input, missing canvases, upstream failures.

use thiserror::Error;

/// Core error type for the Social Canvas workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors (unknown field or tool name, malformed input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A dependency/ordering precondition was not met
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// Content below the required minimum length
    #[error("Content too short: {0}")]
    ContentTooShort(String),

    /// Not found errors (unknown canvas, conversation, or thread id)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure in an upstream collaborator (LLM round trip, knowledge search)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a dependency error
    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }

    /// Create a content-too-short error
    pub fn too_short(msg: impl Into<String>) -> Self {
        Self::ContentTooShort(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an upstream error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
