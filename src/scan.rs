//! Seek ranges over cell keys.
//!
//! Ranges carry owned bounds so a cursor can rewrite its start (for example
//! when resuming after an emitted row) without borrowing from the caller.

use std::ops::Bound;

use bytes::Bytes;

use crate::key::{Key, PartialKey};

/// A key range with owned bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyRange<K> {
    /// Start bound (inclusive/exclusive/unbounded).
    pub start: Bound<K>,
    /// End bound (inclusive/exclusive/unbounded).
    pub end: Bound<K>,
}

impl<K> KeyRange<K> {
    /// Create an unbounded range (all keys).
    pub fn all() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Create a new range from explicit bounds.
    pub fn new(start: Bound<K>, end: Bound<K>) -> Self {
        Self { start, end }
    }

    /// Borrowed view of the bounds suitable for ordered-map range queries.
    pub(crate) fn as_borrowed_bounds(&self) -> (Bound<&K>, Bound<&K>) {
        (self.start.as_ref(), self.end.as_ref())
    }
}

impl<K: Ord> KeyRange<K> {
    /// Whether this range contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        let start_ok = match &self.start {
            Bound::Unbounded => true,
            Bound::Included(bound) => key >= bound,
            Bound::Excluded(bound) => key > bound,
        };
        start_ok && !self.after_end(key)
    }

    /// Whether `key` lies beyond the end bound.
    pub fn after_end(&self, key: &K) -> bool {
        match &self.end {
            Bound::Unbounded => false,
            Bound::Included(bound) => key > bound,
            Bound::Excluded(bound) => key >= bound,
        }
    }

    /// Whether no key can satisfy both bounds.
    pub fn is_empty(&self) -> bool {
        use Bound as B;
        match (&self.start, &self.end) {
            (B::Unbounded, _) | (_, B::Unbounded) => false,
            (B::Included(a), B::Included(b)) => a > b,
            (B::Included(a), B::Excluded(b)) => a >= b,
            (B::Excluded(a), B::Included(b)) => a >= b,
            (B::Excluded(a), B::Excluded(b)) => a >= b,
        }
    }
}

impl KeyRange<Key> {
    /// Every cell of a single row.
    pub fn row(row: impl Into<Bytes>) -> Self {
        let marker = Key::row_marker(row);
        let end = marker.following_key(PartialKey::Row);
        Self::new(Bound::Included(marker), Bound::Excluded(end))
    }

    /// Every cell of the rows in `[start_row, end_row)`; `None` leaves that
    /// side open.
    ///
    /// Hosts use this to split a scan into disjoint sub-ranges on row
    /// boundaries before handing each to a duplicated cursor.
    pub fn rows(start_row: Option<Bytes>, end_row: Option<Bytes>) -> Self {
        let start = match start_row {
            Some(row) => Bound::Included(Key::row_marker(row)),
            None => Bound::Unbounded,
        };
        let end = match end_row {
            Some(row) => Bound::Excluded(Key::row_marker(row)),
            None => Bound::Unbounded,
        };
        Self::new(start, end)
    }
}
