use std::sync::Arc;

use tracing::warn;

use crate::data::PlayerRecord;
use crate::errors::RosterError;
use crate::repository::PlayerRepository;
use crate::retrieval::RetrievalRequest;
use crate::types::RecordId;

/// Player operations exposed to the HTTP layer.
#[derive(Clone)]
pub struct PlayerService {
    repository: Arc<dyn PlayerRepository>,
}

impl PlayerService {
    /// Wrap a player repository.
    pub fn new(repository: Arc<dyn PlayerRepository>) -> Self {
        Self { repository }
    }

    /// Every stored player.
    pub fn players(&self) -> Result<Vec<PlayerRecord>, RosterError> {
        self.repository
            .players()
            .inspect_err(|err| warn!(error = %err, "loading players failed"))
    }

    /// Player with identifier `id`, if stored.
    pub fn player_by_id(&self, id: RecordId) -> Result<Option<PlayerRecord>, RosterError> {
        self.repository
            .player_by_id(id)
            .inspect_err(|err| warn!(player_id = id, error = %err, "player lookup failed"))
    }

    /// Concurrent filtered retrieval over the player collection.
    pub fn filtered_players(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<PlayerRecord>, RosterError> {
        self.repository.filtered_players(request).inspect_err(|err| {
            warn!(
                criterion = %request.criterion(),
                total_items = request.total_items(),
                items_per_worker = request.items_per_worker(),
                error = %err,
                "filtered player retrieval failed"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::FilterCriterion;
    use std::sync::Mutex;

    struct StubRepository {
        players: Vec<PlayerRecord>,
        requests: Mutex<Vec<RetrievalRequest>>,
    }

    impl PlayerRepository for StubRepository {
        fn players(&self) -> Result<Vec<PlayerRecord>, RosterError> {
            Ok(self.players.clone())
        }

        fn player_by_id(&self, id: RecordId) -> Result<Option<PlayerRecord>, RosterError> {
            Ok(self.players.iter().find(|p| p.id == id).cloned())
        }

        fn filtered_players(
            &self,
            request: &RetrievalRequest,
        ) -> Result<Vec<PlayerRecord>, RosterError> {
            self.requests.lock().unwrap().push(*request);
            Err(RosterError::Persistence("unknown error".into()))
        }
    }

    fn player(id: RecordId) -> PlayerRecord {
        PlayerRecord {
            id,
            name: format!("Player {id}"),
            team: "BOS".into(),
            position: "Outfielder".into(),
            height_inches: 72,
            weight_lbs: 190.0,
            age: 28.0,
        }
    }

    #[test]
    fn forwards_to_the_repository() {
        let repo = Arc::new(StubRepository {
            players: vec![player(1), player(2)],
            requests: Mutex::new(Vec::new()),
        });
        let service = PlayerService::new(repo.clone());
        assert_eq!(service.players().unwrap().len(), 2);
        assert_eq!(service.player_by_id(2).unwrap().unwrap().id, 2);

        let request = RetrievalRequest::new(FilterCriterion::Even, 20, 5).unwrap();
        assert!(service.filtered_players(&request).is_err());
        assert_eq!(*repo.requests.lock().unwrap(), vec![request]);
    }
}
