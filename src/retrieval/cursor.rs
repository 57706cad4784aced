use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError};

use crate::data::SourceRecord;
use crate::errors::RosterError;
use crate::source::RecordSource;

/// Mutually-exclusive wrapper that lets many workers share one forward-only source.
///
/// Each successful `read_next` advances the underlying source exactly once, so
/// no two callers ever observe the same row. The lock covers one raw read plus
/// its parse and nothing else.
pub struct GuardedCursor<S, R> {
    state: Mutex<CursorState<S>>,
    _record: PhantomData<fn() -> R>,
}

/// Cursor state owned exclusively by the lock.
struct CursorState<S> {
    source: S,
    rows_read: u64,
    exhausted: bool,
}

impl<S: RecordSource, R: SourceRecord> GuardedCursor<S, R> {
    /// Wrap `source`, already positioned on its first data row.
    pub fn new(source: S) -> Self {
        Self {
            state: Mutex::new(CursorState {
                source,
                rows_read: 0,
                exhausted: false,
            }),
            _record: PhantomData,
        }
    }

    /// Read and parse the next record; `Ok(None)` is end-of-stream.
    ///
    /// End-of-stream is sticky: once observed, every later call returns
    /// `Ok(None)` without touching the source again. A row that fails to parse
    /// is returned as `MalformedRecord` carrying its position.
    pub fn read_next(&self) -> Result<Option<R>, RosterError> {
        let mut state = self.state.lock().expect("record cursor poisoned");
        if state.exhausted {
            return Ok(None);
        }
        let Some(raw) = state.source.read_raw()? else {
            state.exhausted = true;
            return Ok(None);
        };
        state.rows_read += 1;
        R::parse(&raw).map(Some).map_err(|reason| RosterError::MalformedRecord {
            source_id: state.source.source_id().to_string(),
            position: raw.position,
            reason,
        })
    }

    /// Number of rows handed out so far (parsed or not).
    ///
    /// Still answers after a worker panicked while holding the cursor.
    pub fn rows_read(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows_read
    }

    /// Consume the cursor and return the underlying source.
    pub fn into_inner(self) -> S {
        self.state
            .into_inner()
            .expect("record cursor poisoned")
            .source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PlayerRecord;
    use crate::source::InMemorySource;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn player_row(id: i64) -> Vec<String> {
        vec![
            id.to_string(),
            format!("Player {id}"),
            "BAL".into(),
            "Catcher".into(),
            "74".into(),
            "180".into(),
            "25.5".into(),
        ]
    }

    #[test]
    fn end_of_stream_is_sticky() {
        let source = InMemorySource::new("mem", vec![player_row(1)]);
        let cursor: GuardedCursor<_, PlayerRecord> = GuardedCursor::new(source);
        assert_eq!(cursor.read_next().unwrap().unwrap().id, 1);
        assert!(cursor.read_next().unwrap().is_none());
        assert!(cursor.read_next().unwrap().is_none());
        assert_eq!(cursor.rows_read(), 1);
    }

    #[test]
    fn malformed_row_reports_position_and_cursor_moves_on() {
        let mut bad = player_row(2);
        bad[4] = "six feet".into();
        let source = InMemorySource::new("mem", vec![player_row(1), bad, player_row(3)]);
        let cursor: GuardedCursor<_, PlayerRecord> = GuardedCursor::new(source);
        assert!(cursor.read_next().unwrap().is_some());
        match cursor.read_next() {
            Err(RosterError::MalformedRecord {
                source_id,
                position,
                reason,
            }) => {
                assert_eq!(source_id, "mem");
                assert_eq!(position, 2);
                assert!(reason.contains("Height"));
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
        assert_eq!(cursor.read_next().unwrap().unwrap().id, 3);
    }

    #[test]
    fn concurrent_readers_never_share_a_row() {
        let rows = (1..=500).map(player_row).collect();
        let cursor: Arc<GuardedCursor<_, PlayerRecord>> =
            Arc::new(GuardedCursor::new(InMemorySource::new("mem", rows)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cursor = Arc::clone(&cursor);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(record) = cursor.read_next().unwrap() {
                        seen.push(record.id);
                    }
                    seen
                })
            })
            .collect();
        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(all.len(), 500);
        assert_eq!(unique.len(), 500);
        assert_eq!(cursor.rows_read(), 500);
    }
}
