//! Collection-level access to the player and user record sets.
//!
//! The traits are the seams services depend on; the CSV implementations are
//! the only ones shipped, and tests substitute in-memory fakes.

use crate::data::{PlayerRecord, SourceRecord, UserRecord};
use crate::errors::RosterError;
use crate::retrieval::{GuardedCursor, RetrievalRequest};
use crate::source::RecordSource;
use crate::types::RecordId;

mod players;
mod users;

pub use players::CsvPlayerRepository;
pub use users::CsvUserRepository;

/// Read access to the sports-roster collection.
pub trait PlayerRepository: Send + Sync {
    /// Load every player; a malformed row fails the whole load.
    fn players(&self) -> Result<Vec<PlayerRecord>, RosterError>;
    /// Linear lookup by identifier.
    fn player_by_id(&self, id: RecordId) -> Result<Option<PlayerRecord>, RosterError>;
    /// Run the concurrent filtered retrieval over a fresh read of the collection.
    fn filtered_players(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<PlayerRecord>, RosterError>;
}

/// Read/write access to the user-profile collection.
pub trait UserRepository: Send + Sync {
    /// Replace the stored collection with `users`.
    fn save_users(&self, users: &[UserRecord]) -> Result<(), RosterError>;
    /// Load every stored user.
    fn users(&self) -> Result<Vec<UserRecord>, RosterError>;
    /// Linear lookup by identifier.
    fn user_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, RosterError>;
}

/// Drain `source` sequentially into parsed records.
pub(crate) fn load_all<S, R>(source: S) -> Result<Vec<R>, RosterError>
where
    S: RecordSource,
    R: SourceRecord,
{
    let cursor: GuardedCursor<S, R> = GuardedCursor::new(source);
    let mut records = Vec::new();
    while let Some(record) = cursor.read_next()? {
        records.push(record);
    }
    Ok(records)
}

/// First record carrying `id`, scanning in source order.
pub(crate) fn find_by_id<R: SourceRecord>(records: Vec<R>, id: RecordId) -> Option<R> {
    records.into_iter().find(|record| record.record_id() == id)
}
