//! Redundant index detection within one collection.
//!
//! An index `D` is redundant when another index `O` on the same collection starts with the
//! same field, has at least as many fields, and contains every trailing field of `D` in any
//! trailing position. `{ a: 1, b: 1, c: 1 }` therefore covers `{ a: 1, b: 1 }` and
//! `{ a: 1, c: 1 }`, but nothing covers `{ b: 1, a: 1 }` through `{ a: 1, b: 1 }`.
//!
//! Indexes are visited in effective-key order and flagging is one-way: an index already
//! flagged can no longer cover another one, so every group of mutually covering indexes
//! keeps at least one survivor.

use crate::types::Index;
use tracing::warn;

/// Sort ascending by effective key. The sort is stable, so indexes with the same effective
/// key keep their catalog order.
pub fn sort_by_effective_key(indexes: &mut [Index]) {
    indexes.sort_by(|a, b| a.effective_key.cmp(&b.effective_key));
}

/// Whether `other` can serve every query `candidate` serves.
pub fn is_covered_by(candidate: &Index, other: &Index) -> bool {
    let (Some(first), Some(other_first)) = (candidate.first_field(), other.first_field()) else {
        return false;
    };
    if other.is_dupped
        || first != other_first
        || candidate.key_string == other.key_string
        || other.fields.len() < candidate.fields.len()
    {
        return false;
    }
    candidate.fields[1..].iter().all(|field| other.fields[1..].contains(field))
}

/// Flag redundant indexes in place. Expects `indexes` sorted by effective key; the `_id`
/// index and shard-key indexes are never flagged.
pub fn flag_duplicates(indexes: &mut [Index]) {
    for i in 0..indexes.len() {
        if indexes[i].is_id_index() || indexes[i].is_shard_key {
            continue;
        }
        let dupped = indexes.iter().enumerate().any(|(j, other)| j != i && is_covered_by(&indexes[i], other));
        indexes[i].is_dupped = dupped;
    }
}

/// Indexes reported by fewer hosts than the cluster has shards. Advisory only.
pub fn usage_gaps(indexes: &[Index], shard_count: u64) -> Vec<&Index> {
    indexes
        .iter()
        .filter(|index| !index.is_id_index() && !index.is_shard_key)
        .filter(|index| (index.usage.len() as u64) < shard_count)
        .collect()
}

/// Sort, flag redundant indexes and log the shard coverage advisory for one collection.
pub fn analyze(namespace: &str, indexes: &mut [Index], shard_count: u64) {
    sort_by_effective_key(indexes);
    flag_duplicates(indexes);
    for index in usage_gaps(indexes, shard_count) {
        warn!(
            namespace,
            effective_key = %index.effective_key,
            usage_records = index.usage.len(),
            shard_count,
            "Index usage reported by fewer hosts than there are shards, it may be unused on some shards"
        );
    }
}
