//! Concurrent filtered retrieval.
//!
//! Pieces, leaves first:
//! - `filter`: the pure predicate (`FilterCriterion`).
//! - `cursor`: `GuardedCursor`, the lock-serialized reader over a `RecordSource`.
//! - `tickets`: the lazy `1..=total_items` ticket sequence.
//! - `coordinator`: the `Running -> Stopping -> Stopped` stop signal.
//! - `engine`: request validation, the worker pool, and result aggregation.

mod coordinator;
mod cursor;
mod engine;
mod filter;
mod tickets;

pub use coordinator::{CoordinatorState, StopReason, TerminationCoordinator};
pub use cursor::GuardedCursor;
pub use engine::{
    RetrievalEngine, RetrievalReport, RetrievalRequest, WorkerPlan, retrieve_filtered,
};
pub use filter::FilterCriterion;
pub use tickets::{TicketIssuer, TicketStream, ticket_channel};
