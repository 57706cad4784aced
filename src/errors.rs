use std::io;

use thiserror::Error;

use crate::types::{Position, SourceId};

/// Error type for retrieval, persistence, remote-fetch, and configuration failures.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("malformed record in '{source_id}' at row {position}: {reason}")]
    MalformedRecord {
        source_id: SourceId,
        position: Position,
        reason: String,
    },
    #[error("record source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable { source_id: SourceId, reason: String },
    #[error("remote request to '{url}' failed: {reason}")]
    Remote { url: String, reason: String },
    #[error("retrieval worker {worker_id} over '{source_id}' panicked")]
    WorkerPanicked { source_id: SourceId, worker_id: usize },
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
