//! Record source interfaces and built-in sources.
//!
//! Ownership model:
//! - `RecordSource` is the forward-only reader the retrieval engine consumes.
//!   It yields raw rows; parsing happens in the caller so parse failures can
//!   carry the row position.
//! - Sources are opened and positioned on the first data row before they are
//!   handed out (header rows are already skipped).

use std::collections::VecDeque;

use crate::errors::RosterError;
use crate::types::{Position, SourceId};

mod csv_source;

pub use csv_source::CsvRecordSource;

/// One unparsed row plus its position in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data-row ordinal.
    pub position: Position,
    /// Column values in file order.
    pub fields: Vec<String>,
}

impl RawRecord {
    /// Create a raw row at `position`.
    pub fn new(position: Position, fields: Vec<String>) -> Self {
        Self { position, fields }
    }

    /// Borrow the columns when at least `count` are present.
    pub fn expect_fields(&self, count: usize) -> Result<&[String], String> {
        if self.fields.len() < count {
            return Err(format!(
                "expected {count} fields, found {}",
                self.fields.len()
            ));
        }
        Ok(&self.fields)
    }
}

/// Sequential, forward-only reader over an ordered record set.
pub trait RecordSource: Send {
    /// Stable identifier used in error reports and logs.
    fn source_id(&self) -> &str;
    /// Read the next raw row, or `Ok(None)` once the stream is exhausted.
    fn read_raw(&mut self) -> Result<Option<RawRecord>, RosterError>;
}

/// Record source backed by rows held in memory.
pub struct InMemorySource {
    id: SourceId,
    rows: VecDeque<Vec<String>>,
    next_position: Position,
}

impl InMemorySource {
    /// Create a source that yields `rows` in order.
    pub fn new(id: impl Into<SourceId>, rows: Vec<Vec<String>>) -> Self {
        Self {
            id: id.into(),
            rows: rows.into(),
            next_position: 1,
        }
    }

    /// Convenience constructor for rows written as string slices.
    pub fn from_rows<I, R, F>(id: impl Into<SourceId>, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::new(id, rows)
    }

    /// Number of rows not read yet.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RecordSource for InMemorySource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn read_raw(&mut self) -> Result<Option<RawRecord>, RosterError> {
        let Some(fields) = self.rows.pop_front() else {
            return Ok(None);
        };
        let position = self.next_position;
        self.next_position += 1;
        Ok(Some(RawRecord::new(position, fields)))
    }
}
