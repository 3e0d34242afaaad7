//! Domain layer - core types for the export.
//!
//! This layer contains pure domain models and error types
//! without any I/O of its own.

pub mod error;
pub mod models;

pub use error::{AppError, Result};
pub use models::{
    sanitize_name, Credentials, ExportConfig, ExportReport, ExportTarget, Record, TargetOutcome,
};
