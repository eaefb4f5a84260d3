pub mod error;
pub mod local;

use async_trait::async_trait;
use bytes::Bytes;
pub use error::StorageError;
pub use local::LocalStorage;
use std::path::PathBuf;

/// Trait defining snapshot file storage, keyed by file name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Read the whole content stored under `key`
    async fn get_data(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Store `data` under `key`, replacing anything already there. Returns where it landed.
    async fn put_data(&self, data: Bytes, key: &str) -> Result<PathBuf, StorageError>;
}
