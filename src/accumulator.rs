//! Row output hooks.
//!
//! A [`RowAccumulator`] is driven once per row by the cursor:
//! `start_row`, then `process_cell` for each matched cell in source order,
//! then `finish_row` if at least one cell matched. Rows without matches are
//! abandoned after `start_row`, so `start_row` must reset any per-row state.

use std::io;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::{decoder::DecodedValue, key::Key};

/// Per-row output builder injected into a row cursor.
pub trait RowAccumulator: Send + 'static {
    /// Begin a new row, discarding anything buffered for a previous one.
    fn start_row(&mut self, row: &Bytes) -> io::Result<()>;

    /// Record one matched cell.
    fn process_cell(
        &mut self,
        key: &Key,
        value: &Bytes,
        column: &str,
        decoded: DecodedValue,
    ) -> io::Result<()>;

    /// Serialize the current row into the emitted payload.
    fn finish_row(&mut self) -> io::Result<Bytes>;

    /// Fresh instance with the same settings and no row state, used when the
    /// cursor is duplicated.
    fn fork(&self) -> Self
    where
        Self: Sized;
}

/// Emits each row as a JSON object of `column: value`.
///
/// When several cells map to the same column (multiple versions), the first
/// one seen is kept. With newest-first timestamps that is the latest version.
#[derive(Debug, Default)]
pub struct JsonRowAccumulator {
    columns: Map<String, Value>,
}

impl JsonRowAccumulator {
    /// Create an accumulator with no buffered row.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowAccumulator for JsonRowAccumulator {
    fn start_row(&mut self, _row: &Bytes) -> io::Result<()> {
        self.columns.clear();
        Ok(())
    }

    fn process_cell(
        &mut self,
        _key: &Key,
        _value: &Bytes,
        column: &str,
        decoded: DecodedValue,
    ) -> io::Result<()> {
        if !self.columns.contains_key(column) {
            let value = serde_json::to_value(decoded).map_err(io::Error::other)?;
            self.columns.insert(column.to_owned(), value);
        }
        Ok(())
    }

    fn finish_row(&mut self) -> io::Result<Bytes> {
        let columns = std::mem::take(&mut self.columns);
        serde_json::to_vec(&Value::Object(columns))
            .map(Bytes::from)
            .map_err(io::Error::other)
    }

    fn fork(&self) -> Self {
        Self::new()
    }
}
