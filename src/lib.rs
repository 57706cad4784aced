#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// HTTP routing, validation, and the listener loop.
pub mod api;
/// Remote JSON client used for the user collection fallback.
pub mod client;
/// Service and retrieval configuration types.
pub mod config;
/// Centralized constants used across retrieval, storage, and HTTP layers.
pub mod constants;
/// Record types and the parse/identify trait.
pub mod data;
/// Collection repositories (CSV-backed).
pub mod repository;
/// Concurrent filtered-retrieval engine.
pub mod retrieval;
/// Player and user services.
pub mod service;
/// Record source trait and built-in sources.
pub mod source;
/// Shared type aliases.
pub mod types;

mod errors;

pub use api::{ApiResponse, HttpServer, Router};
pub use client::{ApiClient, HttpApiClient};
pub use config::{RetrievalConfig, ServiceConfig};
pub use data::{PlayerRecord, SourceRecord, UserRecord};
pub use errors::RosterError;
pub use repository::{CsvPlayerRepository, CsvUserRepository, PlayerRepository, UserRepository};
pub use retrieval::{
    FilterCriterion, RetrievalEngine, RetrievalReport, RetrievalRequest, StopReason,
    retrieve_filtered,
};
pub use service::{PlayerService, UserService};
pub use source::{CsvRecordSource, InMemorySource, RawRecord, RecordSource};
pub use types::{Position, RecordId, SourceId, TicketId};
