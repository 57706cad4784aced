use std::path::{Path, PathBuf};

use crate::constants::records::PLAYERS_SOURCE_ID;
use crate::data::PlayerRecord;
use crate::errors::RosterError;
use crate::repository::{PlayerRepository, find_by_id, load_all};
use crate::retrieval::{RetrievalEngine, RetrievalRequest};
use crate::source::CsvRecordSource;
use crate::types::RecordId;

/// Player collection stored as a CSV file with a header row.
pub struct CsvPlayerRepository {
    path: PathBuf,
    engine: RetrievalEngine,
}

impl CsvPlayerRepository {
    /// Repository over the CSV file at `path`.
    pub fn new(path: impl Into<PathBuf>, engine: RetrievalEngine) -> Self {
        Self {
            path: path.into(),
            engine,
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlayerRepository for CsvPlayerRepository {
    fn players(&self) -> Result<Vec<PlayerRecord>, RosterError> {
        load_all(CsvRecordSource::open_as(PLAYERS_SOURCE_ID, &self.path)?)
    }

    fn player_by_id(&self, id: RecordId) -> Result<Option<PlayerRecord>, RosterError> {
        Ok(find_by_id(self.players()?, id))
    }

    fn filtered_players(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<PlayerRecord>, RosterError> {
        self.engine
            .retrieve_filtered(CsvRecordSource::open_as(PLAYERS_SOURCE_ID, &self.path)?, request)
    }
}
