use std::io::ErrorKind;
use std::path::{Component, PathBuf};

use crate::models::ArchiveType;

/// Read-only view of the on-disk dist tree.
///
/// Files mirror the download URL layout:
/// `{repo}/dist/{namespace}/{package}/{version}/{reference}.{type}`.
/// Published files are immutable; nothing in this service writes under the root.
pub struct DistStore {
    root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("No stored file matches this distribution")]
    NotFound,
    #[error("Path escapes the dist root: {0}")]
    InvalidPath(String),
    #[error("Storage I/O error: {0}")]
    Io(std::io::Error),
}

impl DistStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read the stored archive bytes for one distribution
    pub async fn read_dist(
        &self,
        repo: &str,
        namespace: &str,
        package: &str,
        version: &str,
        reference: &str,
        dist_type: ArchiveType,
    ) -> Result<Vec<u8>, StorageError> {
        let file_name = format!("{}.{}", reference, dist_type);
        let rel: PathBuf = [repo, "dist", namespace, package, version, file_name.as_str()]
            .iter()
            .collect();

        // Identifiers are validated upstream; reject anything non-normal anyway.
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(StorageError::InvalidPath(rel.display().to_string()));
        }

        match tokio::fs::read(self.root.join(rel)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
