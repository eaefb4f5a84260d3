// Client abstractions module - contains the cluster and storage capability traits

pub mod database;
pub mod storage;

// Re-export commonly used types
pub use database::{mongodb::MongoClusterClient, ClusterClient};
pub use storage::{LocalStorage, StorageClient};
