use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::constants::remote::BODY_PARSE_REASON;
use crate::data::UserRecord;
use crate::errors::RosterError;
use crate::repository::UserRepository;
use crate::types::RecordId;

/// Shape of the remote user listing.
#[derive(Debug, Deserialize)]
struct UsersPage {
    data: Vec<UserRecord>,
}

/// User operations: local collection first, remote API on a miss.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    client: Arc<dyn ApiClient>,
    api_url: String,
}

impl UserService {
    /// Local repository plus the remote client used on a miss.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        client: Arc<dyn ApiClient>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            client,
            api_url: api_url.into(),
        }
    }

    /// Return the stored users, fetching and persisting them when none are stored.
    ///
    /// A failure to persist the fetched users is logged and does not fail the call.
    pub fn users(&self) -> Result<Vec<UserRecord>, RosterError> {
        let local = self.repository.users().unwrap_or_else(|err| {
            debug!(error = %err, "local user collection unavailable");
            Vec::new()
        });
        if !local.is_empty() {
            return Ok(local);
        }

        let payload = self.client.get_json(&self.api_url)?;
        let page: UsersPage =
            serde_json::from_value(payload).map_err(|err| RosterError::Remote {
                url: self.api_url.clone(),
                reason: format!("{BODY_PARSE_REASON}: {err}"),
            })?;
        if let Err(err) = self.repository.save_users(&page.data) {
            warn!(error = %err, "fetched users could not be persisted");
        }
        info!(
            url = %self.api_url,
            users = page.data.len(),
            "user collection fetched from remote API"
        );
        Ok(page.data)
    }

    /// Look a user up in the local collection only.
    pub fn user_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, RosterError> {
        self.repository.user_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryUsers {
        stored: Mutex<Vec<UserRecord>>,
        fail_saves: bool,
    }

    impl UserRepository for MemoryUsers {
        fn save_users(&self, users: &[UserRecord]) -> Result<(), RosterError> {
            if self.fail_saves {
                return Err(RosterError::Persistence("disk full".into()));
            }
            *self.stored.lock().unwrap() = users.to_vec();
            Ok(())
        }

        fn users(&self) -> Result<Vec<UserRecord>, RosterError> {
            Ok(self.stored.lock().unwrap().clone())
        }

        fn user_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, RosterError> {
            Ok(self.users()?.into_iter().find(|u| u.id == id))
        }
    }

    struct ScriptedClient {
        response: Result<Value, String>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(response: Result<Value, String>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ApiClient for ScriptedClient {
        fn get_json(&self, url: &str) -> Result<Value, RosterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map_err(|reason| RosterError::Remote {
                url: url.to_string(),
                reason,
            })
        }
    }

    fn remote_page() -> Value {
        json!({
            "page": 1,
            "data": [
                {"id": 1, "email": "george.bluth@reqres.in", "first_name": "George",
                 "last_name": "Bluth", "avatar": "https://reqres.in/img/faces/1-image.jpg"},
                {"id": 2, "email": "janet.weaver@reqres.in", "first_name": "Janet",
                 "last_name": "Weaver", "avatar": "https://reqres.in/img/faces/2-image.jpg"}
            ]
        })
    }

    #[test]
    fn empty_store_fetches_and_persists() {
        let repo = Arc::new(MemoryUsers::default());
        let client = Arc::new(ScriptedClient::new(Ok(remote_page())));
        let service = UserService::new(repo.clone(), client.clone(), "http://remote/users");

        let users = service.users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(repo.stored.lock().unwrap().len(), 2);
        assert_eq!(service.user_by_id(2).unwrap().unwrap().last_name, "Weaver");

        // Second call is served locally.
        service.users().unwrap();
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn save_failure_still_returns_remote_users() {
        let repo = Arc::new(MemoryUsers {
            fail_saves: true,
            ..MemoryUsers::default()
        });
        let client = Arc::new(ScriptedClient::new(Ok(remote_page())));
        let service = UserService::new(repo, client, "http://remote/users");
        assert_eq!(service.users().unwrap().len(), 2);
    }

    #[test]
    fn remote_failures_propagate() {
        let repo = Arc::new(MemoryUsers::default());
        let client = Arc::new(ScriptedClient::new(Err("connection refused".into())));
        let service = UserService::new(repo.clone(), client, "http://remote/users");
        assert!(matches!(service.users(), Err(RosterError::Remote { .. })));

        let client = Arc::new(ScriptedClient::new(Ok(json!({"unexpected": true}))));
        let service = UserService::new(repo, client, "http://remote/users");
        match service.users() {
            Err(RosterError::Remote { reason, .. }) => {
                assert!(reason.starts_with(BODY_PARSE_REASON))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
