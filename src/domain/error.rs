//! Domain-level error types for now-script-export.
//!
//! All errors are typed with `thiserror`. None of them escalate past the unit
//! of work (one table fetch, one record write) that produced them.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more of the required CLI flags was not supplied.
    #[error("Missing required arguments: {missing}")]
    MissingArguments { missing: String },

    /// Transport-level HTTP failure (connect, TLS, body read).
    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// The instance answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Body parsed but lacks the expected shape.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A table directory path is occupied by something else.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// No remote update set carries the requested name.
    #[error("No remote update set named '{name}'")]
    UpdateSetNotFound { name: String },

    /// Several remote update sets carry the requested name.
    #[error("Remote update set name '{name}' is ambiguous ({count} matches)")]
    AmbiguousUpdateSet { name: String, count: usize },
}

impl AppError {
    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
