use thiserror::Error;

use crate::core::client::database::DatabaseError;
use crate::core::client::storage::StorageError;
use crate::snapshot::SnapshotError;

/// Result type for index inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Error types for the index inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Snapshot error: {0}")]
    SnapshotError(#[from] SnapshotError),

    /// Listing the databases of the cluster failed
    #[error("Failed to list databases: {0}")]
    ListDatabasesError(#[source] DatabaseError),

    /// Listing the collections of a database failed
    #[error("Failed to list collections of {database}: {source}")]
    ListCollectionsError { database: String, source: DatabaseError },

    /// Listing the indexes of a collection failed
    #[error("Failed to list indexes of {namespace}: {source}")]
    ListIndexesError { namespace: String, source: DatabaseError },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
