//! Retrieval of a remote update set's XML export.
//!
//! Two stages: resolve the update set's name to a single sys_id, then download
//! its export and save it as `sys_remote_update_set/<sanitized name>.xml`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::domain::{sanitize_name, AppError, Result, TargetOutcome};
use crate::infrastructure::write_file;

use super::Exporter;

/// Directory (and table) that remote update set exports are saved under.
pub const REMOTE_UPDATE_SET_TABLE: &str = "sys_remote_update_set";

impl Exporter<'_> {
    /// Downloads the remote update set called `name`, logging any failure.
    pub async fn save_remote_update_set(&self, name: &str) -> TargetOutcome {
        let mut outcome = TargetOutcome::new(REMOTE_UPDATE_SET_TABLE);

        match self.try_save_remote_update_set(name, &mut outcome).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Saved remote update set '{name}'");
                outcome.written = 1;
            }
            Err(e) => {
                tracing::error!("[{REMOTE_UPDATE_SET_TABLE}] problem retrieving update set: {e}");
                outcome.error = Some(e.to_string());
            }
        }

        outcome
    }

    async fn try_save_remote_update_set(
        &self,
        name: &str,
        outcome: &mut TargetOutcome,
    ) -> Result<PathBuf> {
        let sys_id = self.resolve_remote_update_set(name).await?;
        outcome.fetched = 1;

        let xml = self.client.export_update_set(&sys_id).await?;

        let dir = self.ensure_directory(REMOTE_UPDATE_SET_TABLE).await?;
        let path = dir.join(format!("{}.xml", sanitize_name(name)));
        write_file(&path, xml.as_bytes()).await?;

        Ok(path)
    }

    /// Resolves an update set name to exactly one sys_id.
    ///
    /// # Errors
    /// Returns `UpdateSetNotFound` for no match and `AmbiguousUpdateSet` when
    /// several distinct records share the name.
    pub async fn resolve_remote_update_set(&self, name: &str) -> Result<String> {
        let ids: BTreeSet<String> = self
            .client
            .find_remote_update_sets(name)
            .await?
            .into_iter()
            .collect();

        let mut iter = ids.into_iter();
        match (iter.next(), iter.len()) {
            (None, _) => Err(AppError::UpdateSetNotFound {
                name: name.to_string(),
            }),
            (Some(id), 0) => {
                tracing::debug!("Remote update set '{name}' resolved to {id}");
                Ok(id)
            }
            (Some(_), rest) => Err(AppError::AmbiguousUpdateSet {
                name: name.to_string(),
                count: rest + 1,
            }),
        }
    }
}
