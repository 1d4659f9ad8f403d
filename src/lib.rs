#![deny(missing_docs)]
//! Row-grouping projection over sorted cell stores.
//!
//! A [`RowMappingCursor`] sits in a scan path, consumes cells sorted by
//! (row, family, qualifier, visibility, timestamp) and emits one record per
//! row that has at least one cell registered in a [`SchemaIndex`]. Matched
//! cells are decoded and handed to a [`RowAccumulator`], whose output becomes
//! the record value. The cursor can be re-seeked after an emitted row through
//! that row's marker key and duplicated for parallel sub-range scans.

mod error;
mod observability;

pub use crate::{
    accumulator::{JsonRowAccumulator, RowAccumulator},
    cursor::{CursorState, RowMappingCursor},
    decoder::{DecodeError, DecodedValue, DecoderRegistry, ValueDecoder},
    error::{ConfigError, ScanError},
    key::{Key, PartialKey},
    scan::KeyRange,
    schema::{SchemaIndex, SchemaMapping, SCHEMA_OPTION},
    source::{MemSource, SortedKvSource},
    timestamp::Timestamp,
};

/// Row output hooks and the JSON accumulator.
pub mod accumulator;

/// The row-grouping cursor.
pub mod cursor;

/// Pluggable value decoders.
pub mod decoder;

/// Cell keys and ordering.
pub mod key;

/// Host-facing option metadata and validation.
pub mod option;

/// Seek ranges.
pub mod scan;

/// Schema mapping configuration and the lookup index.
pub mod schema;

/// Source cursor capability and the in-memory source.
pub mod source;

/// Cell version timestamps.
pub mod timestamp;
