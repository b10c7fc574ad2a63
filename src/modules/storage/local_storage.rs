//! Local filesystem storage client
//!
//! Stores uploaded files flat inside a single directory. Keys are plain
//! filenames; anything that could escape the directory is refused.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::error::AppError;

/// Flat directory storage for uploaded files
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Open the storage root, creating the directory if it doesn't exist
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;

        info!("Local storage ready at {}", root.display());

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its path inside the root
    fn key_to_path(&self, key: &str) -> Result<PathBuf, AppError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(AppError::Internal(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(key))
    }

    /// Write a file, replacing any existing file with the same key
    pub async fn upload(&self, key: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self.key_to_path(key)?;

        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;

        debug!("Stored {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    /// Remove a file; a file that is already gone counts as removed
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.key_to_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    /// Best-effort removal of several files, logging the ones that fail
    pub async fn delete_all(&self, keys: &[String]) {
        let results = join_all(keys.iter().map(|key| self.delete(key))).await;

        for (key, result) in keys.iter().zip(results) {
            if let Err(e) = result {
                warn!("Failed to remove {}: {}", key, e);
            }
        }
    }
}
