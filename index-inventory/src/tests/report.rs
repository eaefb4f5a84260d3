use crate::report::{IndexGlyph, ReportOptions, Reporter};
use crate::tests::common::{id_index, index, sample_snapshot, usage, TEST_HOST};
use crate::types::{Collection, IndexSnapshot};
use mongodb::bson::doc;
use rstest::*;

const PLAIN: ReportOptions = ReportOptions { use_color: false };
const COLORED: ReportOptions = ReportOptions { use_color: true };

fn scenario_a() -> Collection {
    let mut id = id_index();
    id.usage = vec![usage("_id_", TEST_HOST, 5)];
    id.total_ops = 5;
    let mut a = index("a_1", doc! { "a": 1 });
    a.is_dupped = true;
    let mut ab = index("a_1_b_1", doc! { "a": 1, "b": 1 });
    ab.usage = vec![usage("a_1_b_1", "shard01:27018", 2), usage("a_1_b_1", "shard02:27018", 1)];
    ab.total_ops = 3;
    Collection::new("shop", "orders", vec![id, a, ab])
}

#[rstest]
fn plain_collection_report() {
    let rendered = Reporter::new(PLAIN).render_collection(&scenario_a());

    assert_eq!(
        rendered,
        "\nshop.orders:\n\
         \x20 { _id: 1 }\n\thost: db1.example.net:27017, ops: 5, since: 2023-11-14T22:13:20.000Z\n\
         x { a: 1 }\n\
         \x20 { a: 1, b: 1 }\
         \n\thost: shard01:27018, ops: 2, since: 2023-11-14T22:13:20.000Z\
         \n\thost: shard02:27018, ops: 1, since: 2023-11-14T22:13:20.000Z\n"
    );
}

#[rstest]
fn snapshot_report_separates_collections() {
    let snapshot = IndexSnapshot {
        databases: vec![crate::types::Database {
            name: "shop".to_string(),
            collections: vec![
                Collection::new("shop", "carts", vec![id_index()]),
                Collection::new("shop", "orders", vec![id_index()]),
            ],
        }],
        provenance: None,
    };

    let rendered = Reporter::new(PLAIN).render(&snapshot);

    assert_eq!(rendered, "\nshop.carts:\n  { _id: 1 }\n\n\nshop.orders:\n  { _id: 1 }\n\n");
}

#[rstest]
fn empty_snapshot_renders_nothing() {
    assert_eq!(Reporter::new(PLAIN).render(&IndexSnapshot::default()), "");
}

#[rstest]
#[case("_id_", doc! { "_id": 1 }, false, false, 0, IndexGlyph::Identity, ' ')]
#[case("k_hashed", doc! { "k": "hashed" }, true, false, 0, IndexGlyph::ShardKey, '*')]
#[case("a_1", doc! { "a": 1 }, false, true, 12, IndexGlyph::Duplicate, 'x')]
#[case("b_1", doc! { "b": 1 }, false, false, 0, IndexGlyph::Unused, '?')]
#[case("c_1", doc! { "c": 1 }, false, false, 4, IndexGlyph::Plain, ' ')]
fn index_glyphs(
    #[case] name: &str,
    #[case] key: mongodb::bson::Document,
    #[case] is_shard_key: bool,
    #[case] is_dupped: bool,
    #[case] total_ops: i64,
    #[case] glyph: IndexGlyph,
    #[case] symbol: char,
) {
    let mut candidate = index(name, key);
    candidate.is_shard_key = is_shard_key;
    candidate.is_dupped = is_dupped;
    candidate.total_ops = total_ops;

    assert_eq!(IndexGlyph::classify(&candidate), glyph);
    assert_eq!(glyph.symbol(), symbol);
}

#[rstest]
fn unused_id_index_is_not_flagged() {
    assert_eq!(IndexGlyph::classify(&id_index()), IndexGlyph::Identity);
}

#[rstest]
#[case(IndexGlyph::Duplicate, "\x1b[31;1mx { a: 1 }\x1b[0m")]
#[case(IndexGlyph::Unused, "\x1b[34;1m? { a: 1 }\x1b[0m")]
#[case(IndexGlyph::ShardKey, "\x1b[0m* { a: 1 }\x1b[0m")]
#[case(IndexGlyph::Plain, "  { a: 1 }")]
fn colored_index_lines(#[case] glyph: IndexGlyph, #[case] expected: &str) {
    let mut candidate = index("a_1", doc! { "a": 1 });
    candidate.total_ops = 1;
    match glyph {
        IndexGlyph::Duplicate => candidate.is_dupped = true,
        IndexGlyph::Unused => candidate.total_ops = 0,
        IndexGlyph::ShardKey => candidate.is_shard_key = true,
        IndexGlyph::Identity | IndexGlyph::Plain => {}
    }

    assert_eq!(Reporter::new(COLORED).render_index(&candidate), expected);
}

#[rstest]
fn print_writes_rendered_report(sample_snapshot: IndexSnapshot) {
    let reporter = Reporter::new(PLAIN);
    let mut out = Vec::new();

    reporter.print(&sample_snapshot, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, reporter.render(&sample_snapshot));
    assert!(text.contains("\n* { customerId: hashed }\n"));
    assert!(text.contains("\nx { sku: 1 }\n"));
    assert!(text.contains("\n? { coupon: 1 }\n"));
}

#[rstest]
fn color_is_enabled_by_default() {
    assert_eq!(ReportOptions::default(), COLORED);
}

#[rstest]
fn indexes_render_in_effective_key_order() {
    let unsorted = Collection::new(
        "shop",
        "orders",
        vec![index("z_1", doc! { "z": 1 }), id_index(), index("b_-1_a_1", doc! { "b": -1, "a": 1 })],
    );

    let rendered = Reporter::new(PLAIN).render_collection(&unsorted);

    assert_eq!(rendered, "\nshop.orders:\n  { _id: 1 }\n? { b: -1, a: 1 }\n? { z: 1 }\n");
}
