use super::error::DatabaseError;
use super::{CatalogEntry, ClusterClient, IndexRequest};
use crate::config::ConnectionParams;
use crate::types::constant::{CONFIG_DATABASE, SHARDED_COLLECTIONS_REGISTRY, SHARDS_REGISTRY};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, warn};

const APP_NAME: &str = "index-inventory";

/// Run a cluster call and log how long it took.
async fn timed<T, F, Fut>(operation: &'static str, f: F) -> Result<T, DatabaseError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let start = Instant::now();
    let result = f().await;
    debug!(db_operation_name = operation, duration_ms = %start.elapsed().as_millis(), ok = result.is_ok(), "Cluster call finished");
    result
}

/// MongoDB implementation of [`ClusterClient`].
pub struct MongoClusterClient {
    client: Client,
    host: String,
}

impl MongoClusterClient {
    pub async fn new(params: &ConnectionParams) -> Result<Self, DatabaseError> {
        let mut options = ClientOptions::parse(&params.connection_url).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(params.connect_timeout);
        options.server_selection_timeout = Some(params.connect_timeout);

        let host = options
            .hosts
            .first()
            .map(|address| address.to_string())
            .ok_or_else(|| DatabaseError::InvalidConnectionUrl("connection url names no host".to_string()))?;
        let client = Client::with_options(options)?;
        Ok(Self { client, host })
    }

    fn collection(&self, database: &str, collection: &str) -> Collection<Document> {
        self.client.database(database).collection(collection)
    }
}

#[async_trait]
impl ClusterClient for MongoClusterClient {
    fn host(&self) -> String {
        self.host.clone()
    }

    async fn list_database_names(&self) -> Result<Vec<String>, DatabaseError> {
        timed("list_database_names", || async { Ok(self.client.list_database_names(None, None).await?) }).await
    }

    async fn list_collections(&self, database: &str) -> Result<Vec<CatalogEntry>, DatabaseError> {
        timed("list_collections", || async {
            let cursor = self.client.database(database).list_collections(None, None).await?;
            let specs: Vec<Document> = cursor.with_type::<Document>().try_collect().await?;

            let mut entries = Vec::with_capacity(specs.len());
            for spec in specs {
                match spec.get_str("name") {
                    // Servers before 3.4 omit the type of ordinary collections.
                    Ok(name) => entries.push(CatalogEntry::new(name, spec.get_str("type").unwrap_or("collection"))),
                    Err(e) => warn!(database, error = %e, "Skipping catalog entry without a name"),
                }
            }
            Ok(entries)
        })
        .await
    }

    async fn list_indexes(&self, database: &str, collection: &str) -> Result<Vec<Document>, DatabaseError> {
        timed("list_indexes", || async {
            let cursor = self.collection(database, collection).list_indexes(None).await?;
            Ok(cursor.with_type::<Document>().try_collect().await?)
        })
        .await
    }

    async fn index_stats(&self, database: &str, collection: &str) -> Result<Vec<Document>, DatabaseError> {
        timed("index_stats", || async {
            let pipeline = vec![doc! { "$indexStats": {} }];
            let cursor = self.collection(database, collection).aggregate(pipeline, None).await?;
            Ok(cursor.try_collect().await?)
        })
        .await
    }

    async fn count_shards(&self) -> Result<u64, DatabaseError> {
        timed("count_shards", || async {
            Ok(self.collection(CONFIG_DATABASE, SHARDS_REGISTRY).count_documents(None, None).await?)
        })
        .await
    }

    async fn find_shard_key(&self, namespace: &str, key: &Document) -> Result<Option<Document>, DatabaseError> {
        timed("find_shard_key", || async {
            let filter = doc! { "_id": namespace, "key": key.clone() };
            Ok(self.collection(CONFIG_DATABASE, SHARDED_COLLECTIONS_REGISTRY).find_one(filter, None).await?)
        })
        .await
    }

    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        request: IndexRequest,
    ) -> Result<(), DatabaseError> {
        timed("create_index", || async {
            let command = doc! { "createIndexes": collection, "indexes": [request.to_spec()] };
            self.client.database(database).run_command(command, None).await?;
            Ok(())
        })
        .await
    }
}
