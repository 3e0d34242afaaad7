//! Table export service.
//!
//! Fetches every target concurrently and writes each returned record to
//! `<base_dir>/<table>/<sanitized name><extension>`. Failures are logged and
//! counted, never propagated: one broken table or record does not stop the
//! others.

use std::path::PathBuf;

use futures::future::join_all;
use serde_json::Value;

use crate::domain::{
    AppError, ExportConfig, ExportReport, ExportTarget, Record, Result, TargetOutcome,
};
use crate::infrastructure::{ensure_directory, write_file, TableClient};

use super::placeholder::placeholder_document;

/// Exports tables from one instance into the configured base directory.
pub struct Exporter<'a> {
    pub(super) config: &'a ExportConfig,
    pub(super) client: TableClient,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter for the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &'a ExportConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: TableClient::new(config)?,
        })
    }

    /// Exports every target. All targets run concurrently and a failing one
    /// never cancels its siblings.
    pub async fn run(&self, targets: &[ExportTarget]) -> ExportReport {
        let outcomes = join_all(targets.iter().map(|target| self.export_target(target))).await;

        tracing::info!(
            "Export finished: {} targets, {} files written",
            outcomes.len(),
            outcomes.iter().map(|o| o.written).sum::<usize>()
        );

        ExportReport { outcomes }
    }

    /// Fetches one target and writes all of its records.
    pub async fn export_target(&self, target: &ExportTarget) -> TargetOutcome {
        let mut outcome = TargetOutcome::new(&target.table);

        let records = match self.client.fetch_records(target).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("[{}] failed to fetch records: {e}", target.table);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };
        outcome.fetched = records.len();

        if records.is_empty() {
            tracing::info!("[{}] no records returned", target.table);
            return outcome;
        }

        // Once per target, before any write is dispatched.
        if let Err(e) = self.ensure_directory(&target.table).await {
            tracing::error!("[{}] {e}", target.table);
            outcome.error = Some(e.to_string());
            outcome.failed = records.len();
            return outcome;
        }

        let results = join_all(
            records
                .into_iter()
                .map(|raw| self.write_raw_record(raw, target)),
        )
        .await;

        for result in results {
            match result {
                Ok(_) => outcome.written += 1,
                Err(e) => {
                    tracing::error!("[{}] {e}", target.table);
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }

    /// Ensures the output directory for `table` exists.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or its path is taken
    /// by a file.
    pub async fn ensure_directory(&self, table: &str) -> Result<PathBuf> {
        let dir = self.config.table_dir(table);
        ensure_directory(&dir).await?;
        Ok(dir)
    }

    /// Writes one record's content into its table directory.
    ///
    /// The directory must already exist.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub async fn write_record(
        &self,
        record: &Record,
        table: &str,
        extension: &str,
    ) -> Result<PathBuf> {
        let path = self.config.table_dir(table).join(record.filename(extension));

        match record.content() {
            Some(content) => write_file(&path, content.as_bytes()).await?,
            None => {
                tracing::debug!("[{table}] '{}' has no content, writing placeholder", record.name);
                write_file(&path, placeholder_document(&record.name).as_bytes()).await?;
            }
        }

        Ok(path)
    }

    async fn write_raw_record(&self, raw: Value, target: &ExportTarget) -> Result<PathBuf> {
        let record: Record = serde_json::from_value(raw).map_err(|e| AppError::JsonParse {
            message: format!("skipping record: {e}"),
            source: Some(e),
        })?;

        self.write_record(&record, &target.table, &target.extension)
            .await
    }
}
