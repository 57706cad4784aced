use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::constants::http::{
    MSG_INTERNAL_ERROR, MSG_ITEMS_NOT_POSITIVE, MSG_ITEMS_PER_WORKER_NOT_POSITIVE,
    MSG_ITEMS_PER_WORKER_TOO_LARGE, MSG_METHOD_NOT_ALLOWED, MSG_PLAYER_ID_NOT_INTEGER,
    MSG_PLAYER_NOT_FOUND, MSG_ROUTE_NOT_FOUND, MSG_TYPE_NOT_ALLOWED, MSG_USER_ID_NOT_INTEGER,
    MSG_USER_NOT_FOUND, PARAM_ITEMS, PARAM_ITEMS_PER_WORKER, PARAM_TYPE, WELCOME_MESSAGE,
};
use crate::errors::RosterError;
use crate::retrieval::{FilterCriterion, RetrievalRequest};
use crate::service::{PlayerService, UserService};
use crate::types::RecordId;

/// Status code plus JSON body produced for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON payload; error responses carry `{"message": ...}`.
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn message(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "message": message }),
        }
    }

    fn serialized<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self::ok(body),
            Err(err) => {
                error!(error = %err, "response serialization failed");
                Self::message(500, MSG_INTERNAL_ERROR)
            }
        }
    }

    fn failure(err: &RosterError) -> Self {
        match err {
            RosterError::InvalidRequest(message) => Self::message(400, message),
            other => {
                error!(error = %other, "request failed");
                Self::message(500, MSG_INTERNAL_ERROR)
            }
        }
    }

    /// Body rendered as compact JSON text.
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }

    /// Value of the `message` field on error bodies.
    pub fn message_text(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Maps `(method, url)` to service calls. Holds no socket state.
#[derive(Clone)]
pub struct Router {
    players: PlayerService,
    users: UserService,
    started_at: DateTime<Utc>,
}

impl Router {
    /// Build a router over the two services; the health clock starts now.
    pub fn new(players: PlayerService, users: UserService) -> Self {
        Self {
            players,
            users,
            started_at: Utc::now(),
        }
    }

    /// Handle one request. `url` is the request target (path plus optional query).
    pub fn handle(&self, method: &str, url: &str) -> ApiResponse {
        if !method.eq_ignore_ascii_case("GET") {
            return ApiResponse::message(405, MSG_METHOD_NOT_ALLOWED);
        }
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        debug!(method, path, "routing request");
        match segments.as_slice() {
            [] => ApiResponse::ok(json!(WELCOME_MESSAGE)),
            ["health"] => ApiResponse::ok(json!({
                "ok": true,
                "started_at": self.started_at.to_rfc3339(),
            })),
            ["mlb-players"] => match self.players.players() {
                Ok(players) => ApiResponse::serialized(&players),
                Err(err) => ApiResponse::failure(&err),
            },
            ["mlb-players", raw_id] => self.player(raw_id),
            ["random-mlb-players"] => self.filtered_players(&parse_query(query)),
            ["users"] => match self.users.users() {
                Ok(users) => ApiResponse::serialized(&users),
                Err(err) => ApiResponse::failure(&err),
            },
            ["users", raw_id] => self.user(raw_id),
            _ => ApiResponse::message(404, MSG_ROUTE_NOT_FOUND),
        }
    }

    fn player(&self, raw_id: &str) -> ApiResponse {
        let Ok(id) = raw_id.parse::<RecordId>() else {
            return ApiResponse::message(400, MSG_PLAYER_ID_NOT_INTEGER);
        };
        match self.players.player_by_id(id) {
            Ok(Some(player)) => ApiResponse::serialized(&player),
            Ok(None) => ApiResponse::message(404, MSG_PLAYER_NOT_FOUND),
            Err(err) => ApiResponse::failure(&err),
        }
    }

    fn user(&self, raw_id: &str) -> ApiResponse {
        let Ok(id) = raw_id.parse::<RecordId>() else {
            return ApiResponse::message(400, MSG_USER_ID_NOT_INTEGER);
        };
        match self.users.user_by_id(id) {
            Ok(Some(user)) => ApiResponse::serialized(&user),
            Ok(None) => ApiResponse::message(404, MSG_USER_NOT_FOUND),
            Err(err) => ApiResponse::failure(&err),
        }
    }

    fn filtered_players(&self, query: &HashMap<&str, &str>) -> ApiResponse {
        let request = match filter_request(query) {
            Ok(request) => request,
            Err(rejection) => return rejection,
        };
        match self.players.filtered_players(&request) {
            Ok(players) => ApiResponse::serialized(&players),
            Err(err) => ApiResponse::failure(&err),
        }
    }
}

/// Validate the `/random-mlb-players` query before any work starts.
fn filter_request(query: &HashMap<&str, &str>) -> Result<RetrievalRequest, ApiResponse> {
    let criterion = query
        .get(PARAM_TYPE)
        .and_then(|raw| raw.parse::<FilterCriterion>().ok())
        .ok_or_else(|| ApiResponse::message(400, MSG_TYPE_NOT_ALLOWED))?;
    let items = positive(query.get(PARAM_ITEMS))
        .ok_or_else(|| ApiResponse::message(400, MSG_ITEMS_NOT_POSITIVE))?;
    let items_per_worker = positive(query.get(PARAM_ITEMS_PER_WORKER))
        .ok_or_else(|| ApiResponse::message(400, MSG_ITEMS_PER_WORKER_NOT_POSITIVE))?;
    if items_per_worker > items {
        return Err(ApiResponse::message(400, MSG_ITEMS_PER_WORKER_TOO_LARGE));
    }
    RetrievalRequest::new(criterion, items, items_per_worker)
        .map_err(|err| ApiResponse::failure(&err))
}

fn positive(raw: Option<&&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

/// Split `a=1&b=2` into pairs; the first occurrence of a key wins.
fn parse_query(query: &str) -> HashMap<&str, &str> {
    let mut params = HashMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.entry(key).or_insert(value);
    }
    params
}
