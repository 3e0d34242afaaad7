//! Application layer - use cases and orchestration.
//!
//! This layer contains the export logic: fetching each table, writing its
//! records and summarizing the run.

pub mod exporter;
pub mod formatter;
pub mod placeholder;
pub mod update_set;

pub use exporter::Exporter;
pub use formatter::{format_report, format_totals};
