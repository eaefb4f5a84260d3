//! Raw index definitions and per-host usage counters of one collection.

use crate::core::client::database::ClusterClient;
use crate::error::{InventoryError, InventoryResult};
use crate::types::IndexUsage;
use mongodb::bson::{self, Document};
use tracing::{debug, warn};

/// What the catalog and `$indexStats` report for one collection, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCollectionIndexes {
    pub definitions: Vec<Document>,
    pub usage: Vec<IndexUsage>,
}

/// Fetch usage statistics and index definitions of `database.collection`.
///
/// Usage is best effort: a failed `$indexStats` or an undecodable record is logged and
/// skipped. Failing to list the indexes is returned to the caller.
pub async fn fetch_collection_indexes(
    client: &dyn ClusterClient,
    database: &str,
    collection: &str,
) -> InventoryResult<RawCollectionIndexes> {
    let namespace = format!("{}.{}", database, collection);
    let usage = fetch_usage(client, database, collection, &namespace).await;

    let definitions = client
        .list_indexes(database, collection)
        .await
        .map_err(|source| InventoryError::ListIndexesError { namespace: namespace.clone(), source })?;
    debug!(namespace = %namespace, indexes = definitions.len(), usage_records = usage.len(), "Fetched raw indexes");

    Ok(RawCollectionIndexes { definitions, usage })
}

async fn fetch_usage(client: &dyn ClusterClient, database: &str, collection: &str, namespace: &str) -> Vec<IndexUsage> {
    let records = match client.index_stats(database, collection).await {
        Ok(records) => records,
        Err(e) => {
            warn!(namespace, error = %e, "Index usage statistics unavailable, continuing without usage");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| match bson::from_document::<IndexUsage>(record) {
            Ok(usage) => Some(usage),
            Err(e) => {
                warn!(namespace, error = %e, "Skipping undecodable index usage record");
                None
            }
        })
        .collect()
}
