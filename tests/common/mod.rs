//! Common test utilities for integration tests.
#![allow(dead_code)]

use std::{collections::BTreeSet, ops::Bound, sync::Arc};

use bytes::Bytes;
use cellrow::{
    DecoderRegistry, Key, KeyRange, MemSource, SchemaIndex, SchemaMapping, SortedKvSource,
};

/// Schema used across integration tests: `f:q1 -> x`, `f:q2 -> y`, `g:n -> n`.
pub fn test_schema() -> Arc<SchemaIndex> {
    let mappings = vec![
        SchemaMapping::new("strings")
            .field("x", "f", "q1", "string")
            .field("y", "f", "q2", "string"),
        SchemaMapping::new("numbers").field("n", "g", "n", "long"),
    ];
    Arc::new(
        SchemaIndex::from_mappings(&mappings, &DecoderRegistry::default())
            .expect("schema builder configuration should succeed"),
    )
}

/// Pull every record with `next`, the way a host drains a positioned cursor.
pub fn drain(cursor: &mut dyn SortedKvSource) -> Vec<(Key, Bytes)> {
    let mut out = Vec::new();
    while let (Some(key), Some(value)) = (cursor.top_key(), cursor.top_value()) {
        out.push((key.clone(), value.clone()));
        cursor.next().expect("advance");
    }
    out
}

/// Scan `range`, re-seeking after every record from the emitted row's marker
/// key (exclusive) instead of advancing, as a host does when it splits a scan
/// into batches.
pub fn drain_with_reseek(
    cursor: &mut dyn SortedKvSource,
    range: &KeyRange<Key>,
) -> Vec<(Key, Bytes)> {
    let mut out = Vec::new();
    cursor.seek(range, &[], false).expect("initial seek");
    while let (Some(key), Some(value)) = (cursor.top_key(), cursor.top_value()) {
        let marker = Key::row_marker(key.row().clone());
        out.push((key.clone(), value.clone()));
        let resume = KeyRange::new(Bound::Excluded(marker), range.end.clone());
        cursor.seek(&resume, &[], false).expect("resume seek");
    }
    out
}

/// Coordinates a random row may draw from; the first three are mapped.
const COORDINATES: &[(&str, &str)] = &[
    ("f", "q1"),
    ("f", "q2"),
    ("g", "n"),
    ("f", "q3"),
    ("g", "x"),
    ("h", "q1"),
    ("", ""),
];

/// Random sorted cells over `rows` rows plus the rows expected to be emitted.
pub fn random_cells(seed: u64, rows: usize) -> (MemSource, BTreeSet<Bytes>) {
    let mut rng = fastrand::Rng::with_seed(seed);
    let source = MemSource::new();
    let mut expected = BTreeSet::new();
    for row_idx in 0..rows {
        let row = Bytes::from(format!("r{row_idx:04}"));
        for _ in 0..rng.usize(0..5) {
            let coord = rng.usize(0..COORDINATES.len());
            let (family, qualifier) = COORDINATES[coord];
            let value = if (family, qualifier) == ("g", "n") {
                rng.i64(-1000..1000).to_string()
            } else {
                format!("v{}", rng.u32(..))
            };
            let key = Key::new(row.clone(), family, qualifier).with_timestamp(rng.i64(0..100));
            source.insert(key, value);
            if coord < 3 {
                expected.insert(row.clone());
            }
        }
    }
    (source, expected)
}

/// Rows of the emitted records, in emission order.
pub fn rows_of(records: &[(Key, Bytes)]) -> Vec<Bytes> {
    records.iter().map(|(key, _)| key.row().clone()).collect()
}
