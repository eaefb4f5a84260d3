use super::{StorageClient, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores snapshot files on the local filesystem.
///
/// Keys that are absolute paths are used as-is; relative keys resolve against `root`, which
/// is created on first write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidFileName(key.to_string()));
        }
        let path = Path::new(key);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.root.join(path))
        }
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn get_data(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve(key)?;
        let data = tokio::fs::read(&path).await.map_err(|source| StorageError::ReadError { path: path.clone(), source })?;
        debug!(path = %path.display(), bytes = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    async fn put_data(&self, data: Bytes, key: &str) -> Result<PathBuf, StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::WriteError { path: parent.to_path_buf(), source })?;
        }
        tokio::fs::write(&path, &data).await.map_err(|source| StorageError::WriteError { path: path.clone(), source })?;
        debug!(path = %path.display(), bytes = data.len(), "Wrote file");
        Ok(path)
    }
}
