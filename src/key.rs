//! Cell keys, their total order, and the reserved key shapes the row cursor
//! relies on for resumption.

use std::cmp::Ordering;

use bytes::{BufMut, Bytes, BytesMut};

use crate::timestamp::Timestamp;

/// Placeholder family written into every emitted row key.
pub const SYNTHETIC_FAMILY: &[u8] = b"a";
/// Placeholder qualifier written into every emitted row key.
pub const SYNTHETIC_QUALIFIER: &[u8] = b"b";

/// A stored cell: key plus raw value bytes.
pub type Cell = (Key, Bytes);

/// Fully qualified cell key.
///
/// Keys order by row, family, qualifier and visibility (bytewise ascending),
/// then by timestamp descending.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    row: Bytes,
    family: Bytes,
    qualifier: Bytes,
    visibility: Bytes,
    timestamp: Timestamp,
}

/// Key prefix used when computing [`Key::following_key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartialKey {
    /// Row only.
    Row,
    /// Row and family.
    RowFamily,
    /// Row, family and qualifier.
    RowFamilyQualifier,
    /// Row, family, qualifier and visibility.
    RowFamilyQualifierVisibility,
}

impl Key {
    /// Build a key with empty visibility and the newest possible timestamp.
    pub fn new(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            visibility: Bytes::new(),
            timestamp: Timestamp::MAX,
        }
    }

    /// Replace the visibility label.
    pub fn with_visibility(self, visibility: impl Into<Bytes>) -> Self {
        Self {
            visibility: visibility.into(),
            ..self
        }
    }

    /// Replace the timestamp.
    pub fn with_timestamp(self, timestamp: i64) -> Self {
        Self {
            timestamp: Timestamp::new(timestamp),
            ..self
        }
    }

    /// Reserved resumption shape for `row`: empty family, qualifier and
    /// visibility with the maximal timestamp. It sorts before every real cell
    /// of the row.
    pub fn row_marker(row: impl Into<Bytes>) -> Self {
        Self::new(row, Bytes::new(), Bytes::new())
    }

    /// Key emitted for one aggregated row.
    pub fn synthetic(row: impl Into<Bytes>) -> Self {
        Self::new(
            row,
            Bytes::from_static(SYNTHETIC_FAMILY),
            Bytes::from_static(SYNTHETIC_QUALIFIER),
        )
    }

    /// Row identifier.
    pub fn row(&self) -> &Bytes {
        &self.row
    }

    /// Column family.
    pub fn family(&self) -> &Bytes {
        &self.family
    }

    /// Column qualifier.
    pub fn qualifier(&self) -> &Bytes {
        &self.qualifier
    }

    /// Visibility label.
    pub fn visibility(&self) -> &Bytes {
        &self.visibility
    }

    /// Version timestamp.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Whether this key has the reserved row-marker shape.
    pub fn is_row_marker(&self) -> bool {
        self.family.is_empty()
            && self.qualifier.is_empty()
            && self.visibility.is_empty()
            && self.timestamp == Timestamp::MAX
    }

    /// Whether this key has the shape of an emitted row key.
    pub fn is_synthetic(&self) -> bool {
        self.family.as_ref() == SYNTHETIC_FAMILY
            && self.qualifier.as_ref() == SYNTHETIC_QUALIFIER
            && self.visibility.is_empty()
            && self.timestamp == Timestamp::MAX
    }

    /// Smallest key that sorts after every key sharing this key's `part` prefix.
    pub fn following_key(&self, part: PartialKey) -> Key {
        let mut next = Key::row_marker(self.row.clone());
        match part {
            PartialKey::Row => next.row = followed_by_zero(&self.row),
            PartialKey::RowFamily => next.family = followed_by_zero(&self.family),
            PartialKey::RowFamilyQualifier => {
                next.family = self.family.clone();
                next.qualifier = followed_by_zero(&self.qualifier);
            }
            PartialKey::RowFamilyQualifierVisibility => {
                next.family = self.family.clone();
                next.qualifier = self.qualifier.clone();
                next.visibility = followed_by_zero(&self.visibility);
            }
        }
        next
    }
}

fn followed_by_zero(bytes: &Bytes) -> Bytes {
    let mut buf = BytesMut::with_capacity(bytes.len() + 1);
    buf.put_slice(bytes);
    buf.put_u8(0);
    buf.freeze()
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.family.cmp(&other.family))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
            .then_with(|| self.visibility.cmp(&other.visibility))
            .then_with(|| other.timestamp.cmp(&self.timestamp))
    }
}
