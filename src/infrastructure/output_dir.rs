//! Filesystem output for exported records.

use std::io::ErrorKind;
use std::path::Path;

use crate::domain::{AppError, Result};

/// Makes sure `path` is a directory, creating it (one level only) if absent.
///
/// Returns `true` if this call created the directory.
///
/// # Errors
/// Returns error if the path is occupied by a non-directory, or the directory
/// cannot be created.
pub async fn ensure_directory(path: &Path) -> Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => Err(AppError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => match tokio::fs::create_dir(path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Created directory");
                Ok(true)
            }
            // Lost a race with another creator; fine as long as it is a directory.
            Err(e) if e.kind() == ErrorKind::AlreadyExists && is_dir(path).await => Ok(false),
            Err(e) => Err(AppError::io(
                format!("Failed to create directory: {}", path.display()),
                e,
            )),
        },
        Err(e) => Err(AppError::io(
            format!("Failed to inspect: {}", path.display()),
            e,
        )),
    }
}

/// Writes `content` to `path`, replacing any existing file.
///
/// # Errors
/// Returns error if the file cannot be written.
pub async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| AppError::io(format!("Failed to write file: {}", path.display()), e))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_directory_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("sys_ui_script");

        assert!(ensure_directory(&target).await.unwrap());
        assert!(!ensure_directory(&target).await.unwrap());
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_directory_is_not_recursive() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("missing").join("sys_ui_script");

        let err = ensure_directory(&nested).await.unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }

    #[tokio::test]
    async fn test_ensure_directory_rejects_file() {
        let dir = tempdir().unwrap();
        let occupied = dir.path().join("sys_ui_script");
        std::fs::write(&occupied, "not a dir").unwrap();

        let err = ensure_directory(&occupied).await.unwrap_err();
        assert!(matches!(err, AppError::NotADirectory { .. }));
    }

    #[tokio::test]
    async fn test_write_file_overwrites() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");

        write_file(&file, b"first version, longer").await.unwrap();
        write_file(&file, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "second");
    }
}
