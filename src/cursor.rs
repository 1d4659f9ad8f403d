//! Row-grouping projection cursor.
//!
//! [`RowMappingCursor`] wraps a sorted source and re-emits one record per
//! source row that has at least one cell registered in the [`SchemaIndex`].
//! The emitted key is synthetic (`row`, `"a"`, `"b"`); the value is whatever
//! the injected [`RowAccumulator`] produces for the row.

use std::{collections::HashMap, fmt, ops::Bound, sync::Arc};

use bytes::Bytes;

use crate::{
    accumulator::RowAccumulator,
    decoder::DecoderRegistry,
    error::{ConfigError, ScanError},
    key::{Cell, Key, PartialKey},
    observability::log_debug,
    scan::KeyRange,
    schema::{QualifierTable, SchemaIndex},
    source::SortedKvSource,
};

/// Position of a [`RowMappingCursor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// No current record (before the first seek, or after an error).
    Idle,
    /// A record is ready.
    Positioned,
    /// The source is drained; terminal until the next seek.
    Exhausted,
}

/// Cursor that groups a sorted cell stream into one record per matching row.
pub struct RowMappingCursor<A> {
    source: Box<dyn SortedKvSource>,
    schema: Arc<SchemaIndex>,
    accumulator: A,
    top: Option<Cell>,
    state: CursorState,
}

impl<A> RowMappingCursor<A>
where
    A: RowAccumulator,
{
    /// Wrap `source`, routing matched cells through `schema` into `accumulator`.
    pub fn new(source: Box<dyn SortedKvSource>, schema: Arc<SchemaIndex>, accumulator: A) -> Self {
        Self {
            source,
            schema,
            accumulator,
            top: None,
            state: CursorState::Idle,
        }
    }

    /// Build the schema index from host options and wrap `source`.
    ///
    /// Fails before any scan work if the `schema` option is missing,
    /// malformed, or names an unknown decoder kind.
    pub fn init(
        source: Box<dyn SortedKvSource>,
        options: &HashMap<String, String>,
        registry: &DecoderRegistry,
        accumulator: A,
    ) -> Result<Self, ConfigError> {
        let schema = SchemaIndex::from_options(options, registry)?;
        Ok(Self::new(source, Arc::new(schema), accumulator))
    }

    /// Current position.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Shared schema index.
    pub fn schema(&self) -> &Arc<SchemaIndex> {
        &self.schema
    }

    /// Independent cursor sharing the schema index, with a duplicated source
    /// and a fresh accumulator. The copy starts [`CursorState::Idle`].
    pub fn fork(&self) -> Result<Self, ScanError> {
        let source = self.source.duplicate()?;
        log_debug!(component = "cursor", event = "cursor_duplicated");
        Ok(Self::new(
            source,
            Arc::clone(&self.schema),
            self.accumulator.fork(),
        ))
    }

    /// Consume source rows until one yields a record or the source drains.
    fn encode_row(&mut self) -> Result<(), ScanError> {
        let schema = Arc::clone(&self.schema);
        loop {
            let Some(row) = self.source.top_key().map(|key| key.row().clone()) else {
                self.state = CursorState::Exhausted;
                return Ok(());
            };

            self.accumulator
                .start_row(&row)
                .map_err(ScanError::Output)?;

            let mut matched = false;
            let mut family: Option<Bytes> = None;
            let mut qualifiers: Option<&QualifierTable> = None;

            while let Some(key) = self.source.top_key() {
                if key.row() != &row {
                    break;
                }
                if family.as_ref() != Some(key.family()) {
                    family = Some(key.family().clone());
                    qualifiers = schema.family(key.family());
                }
                let Some(binding) = qualifiers.and_then(|table| table.get(key.qualifier())) else {
                    self.source.next()?;
                    continue;
                };

                matched = true;
                let key = key.clone();
                let Some(value) = self.source.top_value().cloned() else {
                    return Err(ScanError::from_source(format!("no value at {key:?}")));
                };
                let decoded = binding.decode(&value)?;
                self.accumulator
                    .process_cell(&key, &value, binding.column(), decoded)
                    .map_err(ScanError::Output)?;
                self.source.next()?;
            }

            if !matched {
                log_debug!(component = "cursor", event = "row_skipped", row = ?row);
                continue;
            }

            let payload = self.accumulator.finish_row().map_err(ScanError::Output)?;
            self.top = Some((Key::synthetic(row), payload));
            self.state = CursorState::Positioned;
            return Ok(());
        }
    }
}

/// Start key for resuming after a previously emitted row, if `range` starts
/// exclusively at a row marker. Any other start goes to the source unchanged.
fn resumption_start(range: &KeyRange<Key>) -> Option<Key> {
    match &range.start {
        Bound::Excluded(start) if start.is_row_marker() => {
            Some(start.following_key(PartialKey::Row))
        }
        _ => None,
    }
}

impl<A> SortedKvSource for RowMappingCursor<A>
where
    A: RowAccumulator,
{
    fn top_key(&self) -> Option<&Key> {
        self.top.as_ref().map(|(key, _)| key)
    }

    fn top_value(&self) -> Option<&Bytes> {
        self.top.as_ref().map(|(_, value)| value)
    }

    fn next(&mut self) -> Result<(), ScanError> {
        self.top = None;
        self.state = CursorState::Idle;
        self.encode_row()
    }

    fn seek(
        &mut self,
        range: &KeyRange<Key>,
        families: &[Bytes],
        inclusive: bool,
    ) -> Result<(), ScanError> {
        self.top = None;
        self.state = CursorState::Idle;

        match resumption_start(range) {
            Some(following) => {
                if range.after_end(&following) {
                    log_debug!(
                        component = "cursor",
                        event = "resume_past_range_end",
                        row = ?following.row(),
                    );
                    self.state = CursorState::Exhausted;
                    return Ok(());
                }
                log_debug!(
                    component = "cursor",
                    event = "resume_after_row",
                    row = ?following.row(),
                );
                let resumed = KeyRange::new(Bound::Included(following), range.end.clone());
                self.source.seek(&resumed, families, inclusive)?;
            }
            None => self.source.seek(range, families, inclusive)?,
        }
        self.encode_row()
    }

    fn duplicate(&self) -> Result<Box<dyn SortedKvSource>, ScanError> {
        Ok(Box::new(self.fork()?))
    }
}

impl<A> fmt::Debug for RowMappingCursor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowMappingCursor")
            .field("schema", &self.schema)
            .field("state", &self.state)
            .field("top", &self.top.as_ref().map(|(key, _)| key))
            .finish()
    }
}
