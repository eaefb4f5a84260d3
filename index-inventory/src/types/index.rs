//! Index inventory data model.
//!
//! The same types are decoded from the catalog, written into snapshot files and read back
//! from them, so every field carries an explicit BSON name. Optional index options are kept
//! as `Option` and skipped when unset, which keeps "never set" distinguishable from an
//! explicit `false`/`0` after a round trip.

use chrono::Utc;
use mongodb::bson::{DateTime, Document};
use serde::{Deserialize, Serialize};

use crate::types::constant::{ID_INDEX_KEY_STRING, INDEX_INVENTORY_VERSION};

/// Full index inventory of one cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    #[serde(default)]
    pub databases: Vec<Database>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl IndexSnapshot {
    pub fn new(databases: Vec<Database>, provenance: Provenance) -> Self {
        Self { databases, provenance: Some(provenance) }
    }

    /// Iterates every collection of every database in snapshot order.
    pub fn collections(&self) -> impl Iterator<Item = (&Database, &Collection)> {
        self.databases.iter().flat_map(|db| db.collections.iter().map(move |coll| (db, coll)))
    }

    pub fn index_count(&self) -> usize {
        self.collections().map(|(_, coll)| coll.indexes.len()).sum()
    }
}

/// Where and how a snapshot was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub version: String,
    pub host: String,
    #[serde(default)]
    pub params: String,
    pub captured_at: DateTime,
}

impl Provenance {
    pub fn new(host: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            version: INDEX_INVENTORY_VERSION.to_string(),
            host: host.into(),
            params: params.into(),
            captured_at: DateTime::from_chrono(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub ns: String,
    pub name: String,
    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Collection {
    pub fn new(database: &str, name: &str, indexes: Vec<Index>) -> Self {
        Self { ns: format!("{}.{}", database, name), name: name.to_string(), indexes }
    }
}

/// One index definition plus the facts derived for it during collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub name: String,
    pub key: Document,
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_filter_expression: Option<Document>,

    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub key_string: String,
    #[serde(default)]
    pub effective_key: String,
    #[serde(default, rename = "isShardkey", alias = "isShardKey")]
    pub is_shard_key: bool,
    #[serde(default)]
    pub is_dupped: bool,
    #[serde(default)]
    pub total_ops: i64,
    #[serde(default)]
    pub usage: Vec<IndexUsage>,
}

impl Index {
    /// The `{ _id: 1 }` index every collection carries.
    pub fn is_id_index(&self) -> bool {
        self.key_string == ID_INDEX_KEY_STRING
    }

    pub fn first_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }
}

/// Usage counters of one index as reported by one host (one per shard on a sharded cluster).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexUsage {
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<String>,
    pub accesses: Accesses,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accesses {
    pub ops: i64,
    pub since: DateTime,
}
