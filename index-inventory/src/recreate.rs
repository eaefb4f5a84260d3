//! Replays a snapshot's indexes onto a live cluster.

use crate::core::client::database::{ClusterClient, IndexRequest};
use crate::types::{Collection, Index, IndexSnapshot};
use futures::StreamExt;
use mongodb::bson::{Bson, Document};
use std::ops::AddAssign;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecreateSummary {
    pub created: usize,
    pub failed: usize,
    /// Shard-key indexes recreated as plain indexes; sharding itself has to be redone separately.
    pub shard_key_reminders: usize,
}

impl AddAssign for RecreateSummary {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.failed += other.failed;
        self.shard_key_reminders += other.shard_key_reminders;
    }
}

/// Key specification in the index's own field order and directions.
pub fn index_keys(index: &Index) -> Document {
    let mut keys = Document::new();
    for field in &index.fields {
        if let Some(direction) = index.key.get(field) {
            keys.insert(field.clone(), direction.clone());
        }
    }
    if keys.is_empty() {
        index.key.clone()
    } else {
        keys
    }
}

/// Creation request carrying every option that differs from the server default.
pub fn index_request(index: &Index) -> IndexRequest {
    let mut options = Document::new();
    if let Some(version) = index.version {
        options.insert("v", version);
    }
    options.insert("name", index.name.clone());
    if index.background == Some(true) {
        options.insert("background", true);
    }
    if let Some(seconds) = index.expire_after_seconds.filter(|seconds| *seconds > 0) {
        options.insert("expireAfterSeconds", seconds);
    }
    if index.unique == Some(true) {
        options.insert("unique", true);
    }
    if index.sparse == Some(true) {
        options.insert("sparse", true);
    }
    if let Some(collation) = &index.collation {
        options.insert("collation", Bson::Document(collation.clone()));
    }
    if let Some(filter) = &index.partial_filter_expression {
        options.insert("partialFilterExpression", Bson::Document(filter.clone()));
    }
    IndexRequest { keys: index_keys(index), options }
}

/// Create every index of one collection, in snapshot order. Failures are logged and skipped.
pub async fn recreate_collection(client: &dyn ClusterClient, database: &str, collection: &Collection) -> RecreateSummary {
    let mut summary = RecreateSummary::default();
    for index in &collection.indexes {
        if index.is_shard_key {
            warn!(
                namespace = %collection.ns,
                key = %index.key_string,
                "Shard key index recreated as a regular index, shard the collection separately"
            );
            summary.shard_key_reminders += 1;
        }

        match client.create_index(database, &collection.name, index_request(index)).await {
            Ok(()) => {
                debug!(namespace = %collection.ns, index = %index.name, "Index created");
                summary.created += 1;
            }
            Err(e) => {
                error!(namespace = %collection.ns, index = %index.name, error = %e, "Failed to create index, continuing");
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Best-effort replay of a snapshot. Collections run concurrently, up to `concurrency` at a
/// time; indexes of one collection are created one after another.
pub async fn recreate(client: &dyn ClusterClient, snapshot: &IndexSnapshot, concurrency: usize) -> RecreateSummary {
    let summaries: Vec<RecreateSummary> = futures::stream::iter(snapshot.collections())
        .map(|(database, collection)| {
            let span = info_span!("recreate", ns = %collection.ns);
            recreate_collection(client, &database.name, collection).instrument(span)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut total = RecreateSummary::default();
    for summary in summaries {
        total += summary;
    }
    info!(
        created = total.created,
        failed = total.failed,
        shard_key_reminders = total.shard_key_reminders,
        "Index recreation finished"
    );
    total
}
