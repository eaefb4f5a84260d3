use crate::config::CollectParams;
use crate::core::client::database::{CatalogEntry, ClusterClient};
use crate::error::{InventoryError, InventoryResult};
use crate::inventory::normalizer::{mark_shard_key, merge_usage, normalize};
use crate::inventory::redundancy::analyze;
use crate::inventory::usage::fetch_collection_indexes;
use crate::types::constant::{ADMIN_DATABASES, REGULAR_COLLECTION_TYPE, SYSTEM_COLLECTION_PREFIX};
use crate::types::{Collection, Database, IndexSnapshot, Provenance};
use futures::{StreamExt, TryStreamExt};
use tracing::{debug, info, info_span, warn, Instrument};

pub fn is_admin_database(name: &str) -> bool {
    ADMIN_DATABASES.contains(&name)
}

/// Only regular, non-system collections carry indexes worth inventorying.
pub fn is_inventoried_collection(entry: &CatalogEntry) -> bool {
    !entry.name.starts_with(SYSTEM_COLLECTION_PREFIX) && entry.collection_type == REGULAR_COLLECTION_TYPE
}

/// Builds an [`IndexSnapshot`] from a live cluster.
pub struct InventoryCollector<'a> {
    client: &'a dyn ClusterClient,
    params: CollectParams,
}

impl<'a> InventoryCollector<'a> {
    pub fn new(client: &'a dyn ClusterClient, params: CollectParams) -> Self {
        Self { client, params }
    }

    /// Inventory every non-administrative database. Failing to enumerate databases or
    /// collections, or to list the indexes of any collection, aborts the whole run.
    pub async fn collect(&self, provenance: Provenance) -> InventoryResult<IndexSnapshot> {
        let names = self.client.list_database_names().await.map_err(InventoryError::ListDatabasesError)?;
        let shard_count = self.shard_count().await;

        let mut databases = Vec::new();
        for name in names {
            if is_admin_database(&name) {
                debug!(database = %name, "Skipping administrative database");
                continue;
            }
            if self.params.database.as_ref().is_some_and(|only| *only != name) {
                continue;
            }
            debug!(database = %name, "Checking database");
            let collections = self.collect_database(&name, shard_count).await?;
            databases.push(Database { name, collections });
        }

        if databases.is_empty() {
            match &self.params.database {
                Some(only) => warn!(database = %only, "Requested database is not available for inventory"),
                None => warn!("No database is available for inventory"),
            }
        }

        let snapshot = IndexSnapshot::new(databases, provenance);
        info!(databases = snapshot.databases.len(), indexes = snapshot.index_count(), "Index inventory collected");
        Ok(snapshot)
    }

    /// Inventory the regular collections of one database, in name order.
    pub async fn collect_database(&self, database: &str, shard_count: u64) -> InventoryResult<Vec<Collection>> {
        let entries = self
            .client
            .list_collections(database)
            .await
            .map_err(|source| InventoryError::ListCollectionsError { database: database.to_string(), source })?;

        let mut names: Vec<String> = entries
            .into_iter()
            .filter(|entry| {
                let keep = is_inventoried_collection(entry);
                if !keep {
                    debug!(database, collection = %entry.name, collection_type = %entry.collection_type, "Skipping collection");
                }
                keep
            })
            .map(|entry| entry.name)
            .collect();
        names.sort();

        // `buffered` yields in input order, so the name order survives concurrent analysis.
        futures::stream::iter(names.iter())
            .map(|name| {
                let span = info_span!("collection", ns = %format!("{}.{}", database, name));
                self.collect_collection(database, name, shard_count).instrument(span)
            })
            .buffered(self.params.concurrency.max(1))
            .try_collect()
            .await
    }

    /// Normalize and analyse the indexes of one collection.
    pub async fn collect_collection(
        &self,
        database: &str,
        collection: &str,
        shard_count: u64,
    ) -> InventoryResult<Collection> {
        let namespace = format!("{}.{}", database, collection);
        let raw = fetch_collection_indexes(self.client, database, collection).await?;

        let mut indexes = Vec::with_capacity(raw.definitions.len());
        for definition in &raw.definitions {
            let mut index = match normalize(definition) {
                Ok(index) => index,
                Err(reason) => {
                    warn!(namespace = %namespace, error = %reason, "Skipping index definition that cannot be normalized");
                    continue;
                }
            };
            mark_shard_key(self.client, &namespace, &mut index).await;
            merge_usage(&mut index, &raw.usage);
            indexes.push(index);
        }

        analyze(&namespace, &mut indexes, shard_count);
        Ok(Collection::new(database, collection, indexes))
    }

    async fn shard_count(&self) -> u64 {
        match self.client.count_shards().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Shard count unavailable, skipping shard coverage advisory");
                0
            }
        }
    }
}

/// Run a full inventory of the cluster behind `client`.
pub async fn collect(
    client: &dyn ClusterClient,
    params: CollectParams,
    provenance: Provenance,
) -> InventoryResult<IndexSnapshot> {
    InventoryCollector::new(client, params).collect(provenance).await
}
