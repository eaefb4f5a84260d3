use crate::core::client::database::{CatalogEntry, DatabaseError, MockClusterClient};
use crate::inventory::normalizer::normalize;
use crate::types::{Accesses, Collection, Database, Index, IndexSnapshot, IndexUsage, Provenance};
use mongodb::bson::{doc, DateTime, Document};
use rstest::*;

pub const TEST_HOST: &str = "db1.example.net:27017";
pub const SINCE_MILLIS: i64 = 1_700_000_000_000;

/// A `listIndexes` entry as a 4.x+ server returns it.
pub fn raw_index(name: &str, key: Document) -> Document {
    doc! { "v": 2, "key": key, "name": name }
}

/// An `$indexStats` record.
pub fn usage_record(name: &str, host: &str, ops: i64) -> Document {
    doc! {
        "name": name,
        "key": {},
        "host": host,
        "accesses": { "ops": ops, "since": DateTime::from_millis(SINCE_MILLIS) },
    }
}

pub fn usage(name: &str, host: &str, ops: i64) -> IndexUsage {
    IndexUsage {
        name: name.to_string(),
        host: host.to_string(),
        shard: None,
        accesses: Accesses { ops, since: DateTime::from_millis(SINCE_MILLIS) },
    }
}

pub fn index(name: &str, key: Document) -> Index {
    normalize(&raw_index(name, key)).expect("test index must normalize")
}

pub fn id_index() -> Index {
    index("_id_", doc! { "_id": 1 })
}

pub fn key_strings(indexes: &[Index]) -> Vec<&str> {
    indexes.iter().map(|index| index.key_string.as_str()).collect()
}

pub fn dupped_key_strings(indexes: &[Index]) -> Vec<&str> {
    indexes.iter().filter(|index| index.is_dupped).map(|index| index.key_string.as_str()).collect()
}

pub fn mongo_failure(reason: &str) -> DatabaseError {
    DatabaseError::MongoError(mongodb::error::Error::from(std::io::Error::new(std::io::ErrorKind::ConnectionReset, reason)))
}

/// A collection with one index of every option flavour.
#[fixture]
pub fn orders_collection() -> Collection {
    let mut ttl = index("createdAt_1", doc! { "createdAt": 1 });
    ttl.expire_after_seconds = Some(3600);
    ttl.background = Some(true);
    ttl.usage = vec![usage("createdAt_1", "shard01:27018", 7)];
    ttl.total_ops = 7;

    let mut unique = index("sku_1_region_-1", doc! { "sku": 1, "region": -1 });
    unique.unique = Some(true);
    unique.collation = Some(doc! { "locale": "fr", "strength": 2 });

    let mut sparse = index("coupon_1", doc! { "coupon": 1 });
    sparse.sparse = Some(true);
    sparse.unique = Some(false);
    sparse.partial_filter_expression = Some(doc! { "coupon": { "$exists": true } });

    let mut shard = index("customerId_hashed", doc! { "customerId": "hashed" });
    shard.is_shard_key = true;

    let mut redundant = index("sku_1", doc! { "sku": 1 });
    redundant.is_dupped = true;

    Collection::new("shop", "orders", vec![id_index(), ttl, shard, redundant, sparse, unique])
}

#[fixture]
pub fn sample_snapshot(orders_collection: Collection) -> IndexSnapshot {
    let mut provenance = Provenance::new(TEST_HOST, "collect --json");
    provenance.captured_at = DateTime::from_millis(SINCE_MILLIS);
    IndexSnapshot::new(vec![Database { name: "shop".to_string(), collections: vec![orders_collection] }], provenance)
}

/// A cluster with the administrative databases plus `shop`, whose only inventoried
/// collection is `orders` with the given raw indexes and usage records.
pub fn single_collection_client(definitions: Vec<Document>, usage: Vec<Document>) -> MockClusterClient {
    let mut client = MockClusterClient::new();
    client.expect_host().return_const(TEST_HOST.to_string());
    client
        .expect_list_database_names()
        .returning(|| Ok(vec!["admin".to_string(), "config".to_string(), "local".to_string(), "shop".to_string()]));
    client.expect_count_shards().returning(|| Ok(0));
    client.expect_list_collections().withf(|database| database == "shop").returning(|_| {
        Ok(vec![
            CatalogEntry::new("orders", "collection"),
            CatalogEntry::new("system.views", "collection"),
            CatalogEntry::new("orders_by_day", "view"),
        ])
    });
    client
        .expect_list_indexes()
        .withf(|database, collection| database == "shop" && collection == "orders")
        .returning(move |_, _| Ok(definitions.clone()));
    client
        .expect_index_stats()
        .withf(|database, collection| database == "shop" && collection == "orders")
        .returning(move |_, _| Ok(usage.clone()));
    client.expect_find_shard_key().returning(|_, _| Ok(None));
    client
}
