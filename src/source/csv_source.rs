use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::errors::RosterError;
use crate::source::{RawRecord, RecordSource};
use crate::types::{Position, SourceId};

/// Forward-only reader over a CSV file whose first row is a header.
///
/// Rows may carry a varying number of fields; short rows are reported by the
/// record parser with their position instead of failing the whole read.
pub struct CsvRecordSource<R: Read = File> {
    id: SourceId,
    reader: csv::Reader<R>,
    row: StringRecord,
    rows_read: Position,
}

impl CsvRecordSource<File> {
    /// Open `path` and position the reader on the first data row.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        Self::open_as(path.display().to_string(), path)
    }

    /// Like `open`, reporting errors and logs under `id` instead of the path.
    pub fn open_as(id: impl Into<SourceId>, path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let id = id.into();
        let file = File::open(path.as_ref()).map_err(|err| RosterError::SourceUnavailable {
            source_id: id.clone(),
            reason: format!("error opening the file: {err}"),
        })?;
        Ok(Self::from_reader(id, file))
    }
}

impl<R: Read> CsvRecordSource<R> {
    /// Wrap any reader producing CSV text with a header row.
    pub fn from_reader(id: impl Into<SourceId>, reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        Self {
            id: id.into(),
            reader,
            row: StringRecord::new(),
            rows_read: 0,
        }
    }
}

impl<R: Read + Send> RecordSource for CsvRecordSource<R> {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn read_raw(&mut self) -> Result<Option<RawRecord>, RosterError> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => Ok(None),
            Ok(true) => {
                self.rows_read += 1;
                let fields = self.row.iter().map(str::to_string).collect();
                Ok(Some(RawRecord::new(self.rows_read, fields)))
            }
            Err(err) if err.is_io_error() => Err(RosterError::Io(err.into())),
            Err(err) => {
                self.rows_read += 1;
                Err(RosterError::MalformedRecord {
                    source_id: self.id.clone(),
                    position: self.rows_read,
                    reason: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn header_is_skipped_and_fields_trimmed() {
        let text = "ID,Name\n 1 , Adam \n2,Paul\n";
        let mut source = CsvRecordSource::from_reader("players", Cursor::new(text));
        let first = source.read_raw().unwrap().unwrap();
        assert_eq!(first.position, 1);
        assert_eq!(first.fields, vec!["1".to_string(), "Adam".to_string()]);
        let second = source.read_raw().unwrap().unwrap();
        assert_eq!(second.position, 2);
        assert!(source.read_raw().unwrap().is_none());
    }

    #[test]
    fn ragged_rows_are_returned_as_is() {
        let text = "ID,Name,Team\n1,Adam\n2,Paul,BAL\n";
        let mut source = CsvRecordSource::from_reader("players", Cursor::new(text));
        assert_eq!(source.read_raw().unwrap().unwrap().fields.len(), 2);
        assert_eq!(source.read_raw().unwrap().unwrap().fields.len(), 3);
    }

    #[test]
    fn header_only_file_is_empty() {
        let mut source = CsvRecordSource::from_reader("players", Cursor::new("ID,Name\n"));
        assert!(source.read_raw().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvRecordSource::open(dir.path().join("absent.csv")).err().unwrap();
        assert!(matches!(err, RosterError::SourceUnavailable { .. }));
    }

    #[test]
    fn open_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ID,Name").unwrap();
        writeln!(file, "9,Zed").unwrap();
        let mut source = CsvRecordSource::open(file.path()).unwrap();
        assert_eq!(source.source_id(), file.path().display().to_string());
        assert_eq!(source.read_raw().unwrap().unwrap().fields[1], "Zed");
    }
}
