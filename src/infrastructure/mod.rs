//! Infrastructure layer - external adapters (HTTP, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod output_dir;
pub mod table_client;

pub use output_dir::{ensure_directory, write_file};
pub use table_client::TableClient;
