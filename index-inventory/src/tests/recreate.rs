use crate::core::client::database::{IndexRequest, MockClusterClient};
use crate::recreate::{index_keys, index_request, recreate, recreate_collection, RecreateSummary};
use crate::tests::common::{index, mongo_failure, orders_collection, sample_snapshot};
use crate::types::{Collection, Database, IndexSnapshot};
use mongodb::bson::{doc, Bson};
use rstest::*;
use std::sync::{Arc, Mutex};

fn recording_client() -> (MockClusterClient, Arc<Mutex<Vec<(String, String, IndexRequest)>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    let mut client = MockClusterClient::new();
    client.expect_create_index().returning(move |database, collection, request| {
        recorded.lock().unwrap().push((database.to_string(), collection.to_string(), request));
        Ok(())
    });
    (client, requests)
}

#[rstest]
fn key_order_and_directions_are_kept() {
    let compound = index("b_-1_a_1_loc_2dsphere", doc! { "b": -1, "a": 1, "loc": "2dsphere" });

    let keys = index_keys(&compound);

    assert_eq!(keys, doc! { "b": -1, "a": 1, "loc": "2dsphere" });
    assert_eq!(keys.keys().collect::<Vec<_>>(), vec!["b", "a", "loc"]);
}

#[rstest]
fn key_falls_back_when_fields_are_missing() {
    let mut legacy = index("a_1", doc! { "a": 1 });
    legacy.fields.clear();

    assert_eq!(index_keys(&legacy), doc! { "a": 1 });
}

#[rstest]
fn request_carries_every_set_option(orders_collection: Collection) {
    let find = |name: &str| orders_collection.indexes.iter().find(|i| i.name == name).unwrap();

    let ttl = index_request(find("createdAt_1"));
    assert_eq!(ttl.keys, doc! { "createdAt": 1 });
    assert_eq!(ttl.options, doc! { "v": 2, "name": "createdAt_1", "background": true, "expireAfterSeconds": 3600 });

    let unique = index_request(find("sku_1_region_-1"));
    assert_eq!(
        unique.options,
        doc! { "v": 2, "name": "sku_1_region_-1", "unique": true, "collation": { "locale": "fr", "strength": 2 } }
    );

    let sparse = index_request(find("coupon_1"));
    assert_eq!(
        sparse.options,
        doc! { "v": 2, "name": "coupon_1", "sparse": true, "partialFilterExpression": { "coupon": { "$exists": true } } }
    );
}

#[rstest]
#[case(Some(false), None, Some(0))]
#[case(None, Some(false), None)]
#[case(Some(false), Some(false), Some(-1))]
fn defaults_are_not_forwarded(
    #[case] unique: Option<bool>,
    #[case] background: Option<bool>,
    #[case] expire_after_seconds: Option<i32>,
) {
    let mut plain = index("a_1", doc! { "a": 1 });
    plain.unique = unique;
    plain.sparse = unique;
    plain.background = background;
    plain.expire_after_seconds = expire_after_seconds;

    let request = index_request(&plain);

    assert_eq!(request.options, doc! { "v": 2, "name": "a_1" });
}

#[rstest]
fn version_is_omitted_when_unknown() {
    let mut plain = index("a_1", doc! { "a": 1 });
    plain.version = None;

    assert_eq!(index_request(&plain).options, doc! { "name": "a_1" });
}

#[rstest]
fn spec_merges_key_and_options() {
    let request = index_request(&index("a_1_b_-1", doc! { "a": 1, "b": -1 }));

    let spec = request.to_spec();

    assert_eq!(spec.get("key"), Some(&Bson::Document(doc! { "a": 1, "b": -1 })));
    assert_eq!(spec.get_str("name").unwrap(), "a_1_b_-1");
    assert_eq!(request.name(), Some("a_1_b_-1"));
}

#[rstest]
#[tokio::test]
async fn collection_indexes_are_created_in_snapshot_order(orders_collection: Collection) {
    let (client, requests) = recording_client();

    let summary = recreate_collection(&client, "shop", &orders_collection).await;

    assert_eq!(summary, RecreateSummary { created: 6, failed: 0, shard_key_reminders: 1 });
    let requests = requests.lock().unwrap();
    let names: Vec<&str> = requests.iter().filter_map(|(_, _, request)| request.name()).collect();
    assert_eq!(names, vec!["_id_", "createdAt_1", "customerId_hashed", "sku_1", "coupon_1", "sku_1_region_-1"]);
    assert!(requests.iter().all(|(database, collection, _)| database == "shop" && collection == "orders"));
}

#[rstest]
#[tokio::test]
async fn failures_do_not_stop_the_replay(orders_collection: Collection) {
    let mut client = MockClusterClient::new();
    client.expect_create_index().returning(|_, _, request| match request.name() {
        Some("createdAt_1") | Some("coupon_1") => Err(mongo_failure("IndexOptionsConflict")),
        _ => Ok(()),
    });

    let summary = recreate_collection(&client, "shop", &orders_collection).await;

    assert_eq!(summary, RecreateSummary { created: 4, failed: 2, shard_key_reminders: 1 });
}

#[rstest]
#[tokio::test]
async fn snapshot_replay_totals_every_collection(sample_snapshot: IndexSnapshot) {
    let mut snapshot = sample_snapshot;
    snapshot.databases.push(Database {
        name: "billing".to_string(),
        collections: vec![
            Collection::new("billing", "invoices", vec![index("_id_", doc! { "_id": 1 })]),
            Collection::new("billing", "payments", vec![index("_id_", doc! { "_id": 1 }), index("paidAt_1", doc! { "paidAt": 1 })]),
        ],
    });
    let (client, requests) = recording_client();

    let summary = recreate(&client, &snapshot, 2).await;

    assert_eq!(summary, RecreateSummary { created: 9, failed: 0, shard_key_reminders: 1 });
    let requests = requests.lock().unwrap();
    assert_eq!(requests.iter().filter(|(database, _, _)| database == "billing").count(), 3);
}

#[rstest]
#[tokio::test]
async fn empty_snapshot_creates_nothing() {
    let mut client = MockClusterClient::new();
    client.expect_create_index().never();

    let summary = recreate(&client, &IndexSnapshot::default(), 0).await;

    assert_eq!(summary, RecreateSummary::default());
}
