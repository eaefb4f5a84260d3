/// Version stamped into every snapshot's provenance.
pub const INDEX_INVENTORY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Administrative databases that never take part in an inventory.
pub const ADMIN_DATABASES: [&str; 3] = ["admin", "config", "local"];

/// Collections with this prefix are internal to the server.
pub const SYSTEM_COLLECTION_PREFIX: &str = "system.";

/// Catalog type reported by `listCollections` for ordinary collections (views and
/// time-series buckets report something else).
pub const REGULAR_COLLECTION_TYPE: &str = "collection";

/// Key string of the default identity index every collection has.
pub const ID_INDEX_KEY_STRING: &str = "{ _id: 1 }";

/// Database and collections of the cluster's shard catalog.
pub const CONFIG_DATABASE: &str = "config";
pub const SHARDED_COLLECTIONS_REGISTRY: &str = "collections";
pub const SHARDS_REGISTRY: &str = "shards";

/// Snapshot file suffixes. Files produced by this tool end with the index suffix; the
/// legacy stats snapshot shares the same top-level layout and is accepted on load.
pub const INDEX_SNAPSHOT_SUFFIX: &str = "-index.bson.gz";
pub const LEGACY_STATS_SNAPSHOT_SUFFIX: &str = "-stats.bson.gz";
pub const INDEX_JSON_SUFFIX: &str = "-index.json";

pub const DEFAULT_OUTPUT_DIR: &str = "./out";
pub const DEFAULT_CONCURRENCY: usize = 4;
