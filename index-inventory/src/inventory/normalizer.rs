//! Turns raw catalog index definitions into [`Index`] records.

use crate::core::client::database::ClusterClient;
use crate::types::{Index, IndexUsage};
use mongodb::bson::{Bson, Document};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a raw definition could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("index definition has no name")]
    MissingName,
    #[error("index definition has no key document")]
    MissingKey,
    #[error("index key document is empty")]
    EmptyKey,
}

/// Build an [`Index`] from a `listIndexes` entry: options, field list, key string and
/// effective key. Shard-key and usage annotations are applied separately.
pub fn normalize(raw: &Document) -> Result<Index, NormalizeError> {
    let name = raw.get_str("name").map_err(|_| NormalizeError::MissingName)?.to_string();
    let key = raw.get_document("key").map_err(|_| NormalizeError::MissingKey)?.clone();
    if key.is_empty() {
        return Err(NormalizeError::EmptyKey);
    }

    let fields: Vec<String> = key.keys().cloned().collect();
    let key_string = key_string(&key);
    let effective_key = effective_key(&key_string);

    Ok(Index {
        name,
        version: raw.get("v").and_then(bson_to_i32),
        unique: raw.get("unique").and_then(bson_to_bool),
        sparse: raw.get("sparse").and_then(bson_to_bool),
        background: raw.get("background").and_then(bson_to_bool),
        expire_after_seconds: raw.get("expireAfterSeconds").and_then(bson_to_i32),
        collation: raw.get_document("collation").ok().cloned(),
        partial_filter_expression: raw.get_document("partialFilterExpression").ok().cloned(),
        key,
        fields,
        key_string,
        effective_key,
        ..Default::default()
    })
}

/// `{ a: 1, b: -1 }` rendering of a key specification, directions as declared.
pub fn key_string(key: &Document) -> String {
    let entries: Vec<String> = key.iter().map(|(field, direction)| format!("{}: {}", field, direction_text(direction))).collect();
    format!("{{ {} }}", entries.join(", "))
}

/// Key string without its braces and with every descending direction folded to ascending.
pub fn effective_key(key_string: &str) -> String {
    let inner = key_string.strip_prefix("{ ").and_then(|s| s.strip_suffix(" }")).unwrap_or(key_string);
    inner.replace(": -1", ": 1")
}

/// Literal text of a key direction: `1`, `-1`, `text`, `2dsphere`, `hashed`, ...
pub fn direction_text(direction: &Bson) -> String {
    match direction {
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        Bson::Double(f) => f.to_string(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Set `is_shard_key` when the shard registry holds exactly this key for `namespace`.
/// A failed lookup is logged and leaves the flag unset.
pub async fn mark_shard_key(client: &dyn ClusterClient, namespace: &str, index: &mut Index) {
    match client.find_shard_key(namespace, &index.key).await {
        Ok(entry) => index.is_shard_key = entry.is_some(),
        Err(e) => {
            warn!(namespace, index = %index.name, error = %e, "Shard key lookup failed, treating index as not a shard key");
        }
    }
    debug!(namespace, key = %index.key_string, is_shard_key = index.is_shard_key, "Checked shard key");
}

/// Attach every usage record reported for this index name and total their operations.
pub fn merge_usage(index: &mut Index, usage: &[IndexUsage]) {
    for record in usage.iter().filter(|record| record.name == index.name) {
        index.total_ops += record.accesses.ops;
        index.usage.push(record.clone());
    }
}

fn bson_to_i32(value: &Bson) -> Option<i32> {
    match value {
        Bson::Int32(n) => Some(*n),
        Bson::Int64(n) => i32::try_from(*n).ok(),
        Bson::Double(f) if f.is_finite() => Some(f.trunc() as i32),
        _ => None,
    }
}

fn bson_to_bool(value: &Bson) -> Option<bool> {
    match value {
        Bson::Boolean(b) => Some(*b),
        Bson::Int32(n) => Some(*n != 0),
        Bson::Int64(n) => Some(*n != 0),
        Bson::Double(f) => Some(*f != 0.0),
        _ => None,
    }
}
