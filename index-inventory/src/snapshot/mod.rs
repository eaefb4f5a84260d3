//! Snapshot codec: gzip-compressed BSON for replay, relaxed extended JSON for reading.
//!
//! The compressed payload is a single BSON document shaped exactly like [`IndexSnapshot`].
//! Unknown top-level fields are ignored on read and unset options are omitted on write.

pub mod error;

use crate::core::client::storage::StorageClient;
use crate::types::constant::{INDEX_JSON_SUFFIX, INDEX_SNAPSHOT_SUFFIX, LEGACY_STATS_SNAPSHOT_SUFFIX};
use crate::types::IndexSnapshot;
use bytes::Bytes;
pub use error::SnapshotError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use mongodb::bson;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

const UNKNOWN_HOST: &str = "localhost";

/// Serialize and gzip a snapshot.
pub fn encode(snapshot: &IndexSnapshot) -> Result<Vec<u8>, SnapshotError> {
    let raw = bson::to_vec(snapshot)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

/// Gunzip and deserialize a snapshot. Nothing is returned unless the whole payload decodes.
pub fn decode(data: &[u8]) -> Result<IndexSnapshot, SnapshotError> {
    let mut decoder = GzDecoder::new(data);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(bson::from_slice(&raw)?)
}

/// Relaxed extended JSON rendering of a snapshot. Write-only: it is not read back.
pub fn to_extended_json(snapshot: &IndexSnapshot) -> Result<String, SnapshotError> {
    let value = bson::to_bson(snapshot)?.into_relaxed_extjson();
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Host rendered as a single path component: port separators and the slashes of a Unix
/// socket path become `_`.
fn file_stem(host: &str) -> String {
    host.replace([':', '/', '\\'], "_")
}

/// Snapshot file name for a cluster host, e.g. `db1_27017-index.bson.gz`.
pub fn snapshot_file_name(host: &str) -> String {
    format!("{}{}", file_stem(host), INDEX_SNAPSHOT_SUFFIX)
}

/// JSON export file name for a cluster host, e.g. `db1_27017-index.json`.
pub fn json_file_name(host: &str) -> String {
    format!("{}{}", file_stem(host), INDEX_JSON_SUFFIX)
}

pub fn is_supported_snapshot(file_name: &str) -> bool {
    file_name.ends_with(INDEX_SNAPSHOT_SUFFIX) || file_name.ends_with(LEGACY_STATS_SNAPSHOT_SUFFIX)
}

fn source_host(snapshot: &IndexSnapshot) -> &str {
    snapshot.provenance.as_ref().map(|p| p.host.as_str()).filter(|host| !host.is_empty()).unwrap_or(UNKNOWN_HOST)
}

/// Write the compressed snapshot, named after the host it was captured from.
pub async fn save(storage: &dyn StorageClient, snapshot: &IndexSnapshot) -> Result<PathBuf, SnapshotError> {
    let data = encode(snapshot)?;
    let path = storage.put_data(Bytes::from(data), &snapshot_file_name(source_host(snapshot))).await?;
    info!(path = %path.display(), "Index snapshot written");
    Ok(path)
}

/// Write the extended JSON export next to the snapshot.
pub async fn save_json(storage: &dyn StorageClient, snapshot: &IndexSnapshot) -> Result<PathBuf, SnapshotError> {
    let json = to_extended_json(snapshot)?;
    let path = storage.put_data(Bytes::from(json), &json_file_name(source_host(snapshot))).await?;
    info!(path = %path.display(), "Index snapshot JSON written");
    Ok(path)
}

/// Load a snapshot file. Names without a recognized suffix are rejected before any read.
pub async fn load(storage: &dyn StorageClient, file_name: &str) -> Result<IndexSnapshot, SnapshotError> {
    if !is_supported_snapshot(file_name) {
        return Err(SnapshotError::UnsupportedFileType(file_name.to_string()));
    }
    let data = storage.get_data(file_name).await?;
    let snapshot = decode(&data)?;
    debug!(file = file_name, databases = snapshot.databases.len(), "Index snapshot loaded");
    Ok(snapshot)
}
