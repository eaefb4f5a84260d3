use crate::core::client::storage::StorageError;
use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// File name carries neither snapshot suffix. Raised before the file is touched.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to encode snapshot: {0}")]
    EncodeError(#[from] bson::ser::Error),

    #[error("Failed to decode snapshot: {0}")]
    DecodeError(#[from] bson::de::Error),

    #[error("Failed to compress or decompress snapshot: {0}")]
    CompressionError(#[from] std::io::Error),

    #[error("Failed to render snapshot as JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Snapshot storage error: {0}")]
    StorageError(#[from] StorageError),
}
