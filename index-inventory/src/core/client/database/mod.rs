pub mod error;
pub mod mongodb;

use ::mongodb::bson::{doc, Document};
use async_trait::async_trait;
pub use error::DatabaseError;

/// A collection as listed by the catalog: its name and catalog type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub collection_type: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, collection_type: impl Into<String>) -> Self {
        Self { name: name.into(), collection_type: collection_type.into() }
    }
}

/// A single index creation request: the key specification plus every option to apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexRequest {
    pub keys: Document,
    pub options: Document,
}

impl IndexRequest {
    /// Index specification as expected inside a `createIndexes` command.
    pub fn to_spec(&self) -> Document {
        let mut spec = doc! { "key": self.keys.clone() };
        spec.extend(self.options.clone());
        spec
    }

    pub fn name(&self) -> Option<&str> {
        self.options.get_str("name").ok()
    }
}

/// Read-only inspection and index creation against a live cluster.
///
/// Every call is bounded by the deadlines configured on the underlying connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Seed host of the connection, used to name snapshot files.
    fn host(&self) -> String;

    /// list_database_names - Names of every database on the cluster
    async fn list_database_names(&self) -> Result<Vec<String>, DatabaseError>;

    /// list_collections - Name and catalog type of every collection of a database
    async fn list_collections(&self, database: &str) -> Result<Vec<CatalogEntry>, DatabaseError>;

    /// list_indexes - Raw index definitions of a collection, in catalog order
    async fn list_indexes(&self, database: &str, collection: &str) -> Result<Vec<Document>, DatabaseError>;

    /// index_stats - Raw `$indexStats` records of a collection, one per index per host
    async fn index_stats(&self, database: &str, collection: &str) -> Result<Vec<Document>, DatabaseError>;

    /// count_shards - Number of shards registered in the shard catalog (zero when not sharded)
    async fn count_shards(&self) -> Result<u64, DatabaseError>;

    /// find_shard_key - Shard registry entry of `namespace` whose key is exactly `key`
    async fn find_shard_key(&self, namespace: &str, key: &Document) -> Result<Option<Document>, DatabaseError>;

    /// create_index - Create one index on a collection
    async fn create_index(&self, database: &str, collection: &str, request: IndexRequest)
        -> Result<(), DatabaseError>;
}
