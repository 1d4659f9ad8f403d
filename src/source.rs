//! Sorted cell sources.
//!
//! [`SortedKvSource`] is the pull interface a host drives: seek to a range,
//! then read `top_key`/`top_value` and call `next` until `has_top` turns
//! false. The row cursor both consumes and implements it, so cursors stack.

use std::{fmt, ops::Bound, sync::Arc};

use bytes::Bytes;
use crossbeam_skiplist::SkipMap;

use crate::{
    error::ScanError,
    key::{Cell, Key},
    scan::KeyRange,
};

/// Sorted, seekable, duplicable cursor over cells.
///
/// Implementations must yield cells in [`Key`] order and keep all cells of a
/// row contiguous.
pub trait SortedKvSource: Send {
    /// Whether a current cell is available.
    fn has_top(&self) -> bool {
        self.top_key().is_some()
    }

    /// Key of the current cell.
    fn top_key(&self) -> Option<&Key>;

    /// Value of the current cell.
    fn top_value(&self) -> Option<&Bytes>;

    /// Move to the next cell.
    fn next(&mut self) -> Result<(), ScanError>;

    /// Position at the first cell of `range`.
    ///
    /// `families` filters column families: empty means all of them,
    /// otherwise `inclusive` keeps only the listed families and `!inclusive`
    /// drops them.
    fn seek(
        &mut self,
        range: &KeyRange<Key>,
        families: &[Bytes],
        inclusive: bool,
    ) -> Result<(), ScanError>;

    /// Independent cursor over the same data. The copy must be seeked before
    /// use.
    fn duplicate(&self) -> Result<Box<dyn SortedKvSource>, ScanError>;
}

/// In-memory source over a shared skip list.
///
/// Duplicates share the underlying cells; each keeps its own position.
pub struct MemSource {
    cells: Arc<SkipMap<Key, Bytes>>,
    range: KeyRange<Key>,
    families: Vec<Bytes>,
    inclusive: bool,
    top: Option<Cell>,
}

impl MemSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::with_cells(Arc::new(SkipMap::new()))
    }

    /// Source over an existing shared cell map.
    pub fn with_cells(cells: Arc<SkipMap<Key, Bytes>>) -> Self {
        Self {
            cells,
            range: KeyRange::all(),
            families: Vec::new(),
            inclusive: false,
            top: None,
        }
    }

    /// Insert or overwrite a cell. Visible to cursors on their next seek or
    /// advance.
    pub fn insert(&self, key: Key, value: impl Into<Bytes>) {
        self.cells.insert(key, value.into());
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is stored.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn accepts(&self, family: &Bytes) -> bool {
        if self.families.is_empty() {
            return true;
        }
        self.families.contains(family) == self.inclusive
    }

    fn first_from(&self, start: Bound<&Key>) -> Option<Cell> {
        self.cells
            .range::<Key, _>((start, self.range.end.as_ref()))
            .find(|entry| self.accepts(entry.key().family()))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
    }
}

impl Default for MemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for MemSource
where
    K: Into<Key>,
    V: Into<Bytes>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let source = MemSource::new();
        for (key, value) in iter {
            source.insert(key.into(), value);
        }
        source
    }
}

impl fmt::Debug for MemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemSource")
            .field("cells", &self.cells.len())
            .field("range", &self.range)
            .field("top", &self.top.as_ref().map(|(key, _)| key))
            .finish()
    }
}

impl SortedKvSource for MemSource {
    fn top_key(&self) -> Option<&Key> {
        self.top.as_ref().map(|(key, _)| key)
    }

    fn top_value(&self) -> Option<&Bytes> {
        self.top.as_ref().map(|(_, value)| value)
    }

    fn next(&mut self) -> Result<(), ScanError> {
        if let Some((current, _)) = self.top.take() {
            self.top = self.first_from(Bound::Excluded(&current));
        }
        Ok(())
    }

    fn seek(
        &mut self,
        range: &KeyRange<Key>,
        families: &[Bytes],
        inclusive: bool,
    ) -> Result<(), ScanError> {
        self.range = range.clone();
        self.families = families.to_vec();
        self.inclusive = inclusive;
        let (start, _) = range.as_borrowed_bounds();
        self.top = self.first_from(start);
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn SortedKvSource>, ScanError> {
        Ok(Box::new(MemSource::with_cells(Arc::clone(&self.cells))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &mut dyn SortedKvSource) -> Vec<(Key, Bytes)> {
        let mut out = Vec::new();
        while source.has_top() {
            let key = source.top_key().expect("top key").clone();
            let value = source.top_value().expect("top value").clone();
            out.push((key, value));
            source.next().expect("next");
        }
        out
    }

    fn sample() -> MemSource {
        [
            (Key::new("r2", "f", "q"), "r2fq"),
            (Key::new("r1", "g", "q"), "r1gq"),
            (Key::new("r1", "f", "q").with_timestamp(1), "old"),
            (Key::new("r1", "f", "q").with_timestamp(2), "new"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn yields_cells_in_key_order() {
        let mut source = sample();
        assert!(!source.has_top());
        source.seek(&KeyRange::all(), &[], false).expect("seek");
        let values: Vec<_> = collect(&mut source)
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        assert_eq!(values, vec!["new", "old", "r1gq", "r2fq"]);
    }

    #[test]
    fn seek_honours_range_bounds() {
        let mut source = sample();
        source
            .seek(&KeyRange::row("r1"), &[], false)
            .expect("seek");
        assert_eq!(collect(&mut source).len(), 3);

        let start = Key::new("r1", "f", "q").with_timestamp(2);
        source
            .seek(
                &KeyRange::new(Bound::Excluded(start), Bound::Unbounded),
                &[],
                false,
            )
            .expect("seek");
        assert_eq!(source.top_value().map(|v| v.as_ref()), Some(&b"old"[..]));
    }

    #[test]
    fn family_filter_inclusive_and_exclusive() {
        let mut source = sample();
        let families = [Bytes::from_static(b"g")];
        source
            .seek(&KeyRange::all(), &families, true)
            .expect("seek");
        let only_g = collect(&mut source);
        assert_eq!(only_g.len(), 1);
        assert_eq!(only_g[0].0.family().as_ref(), b"g");

        source
            .seek(&KeyRange::all(), &families, false)
            .expect("seek");
        assert!(collect(&mut source)
            .iter()
            .all(|(key, _)| key.family().as_ref() != b"g"));
    }

    #[test]
    fn insert_overwrites_existing_key() {
        let source = MemSource::new();
        assert!(source.is_empty());
        source.insert(Key::new("r", "f", "q"), "first");
        source.insert(Key::new("r", "f", "q"), "second");
        source.insert(Key::new("r", "f", "q").with_timestamp(1), "older");
        assert_eq!(source.len(), 2);
        assert!(!source.is_empty());
    }

    #[test]
    fn duplicate_shares_cells_with_independent_position() {
        let mut source = sample();
        source.seek(&KeyRange::all(), &[], false).expect("seek");
        source.next().expect("next");

        let mut copy = source.duplicate().expect("duplicate");
        assert!(!copy.has_top());
        copy.seek(&KeyRange::row("r2"), &[], false).expect("seek");
        assert_eq!(collect(copy.as_mut()).len(), 1);
        assert_eq!(source.top_value().map(|v| v.as_ref()), Some(&b"old"[..]));
    }
}
