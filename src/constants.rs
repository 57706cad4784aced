/// Constants used by the concurrent filtered-retrieval engine.
pub mod retrieval {
    /// Upper bound on concurrently running retrieval workers.
    pub const DEFAULT_MAX_WORKERS: usize = 64;
    /// First ticket number issued per retrieval.
    pub const FIRST_TICKET: u64 = 1;
    /// Query-string spelling of the even-identifier criterion.
    pub const CRITERION_EVEN: &str = "even";
    /// Query-string spelling of the odd-identifier criterion.
    pub const CRITERION_ODD: &str = "odd";
}

/// Constants used by the player and user CSV collections.
pub mod records {
    /// Source id reported for the player collection.
    pub const PLAYERS_SOURCE_ID: &str = "mlb_players";
    /// Source id reported for the user collection.
    pub const USERS_SOURCE_ID: &str = "users";
    /// Number of columns in a player row.
    pub const PLAYER_FIELD_COUNT: usize = 7;
    /// Number of columns in a user row.
    pub const USER_FIELD_COUNT: usize = 5;
    /// Header written before persisted user rows.
    pub const USER_CSV_HEADER: [&str; USER_FIELD_COUNT] =
        ["Id", "Email", "FirstName", "LastName", "Avatar"];
    /// Default on-disk location of the player collection.
    pub const DEFAULT_PLAYERS_CSV: &str = "data/mlb_players.csv";
    /// Default on-disk location of the user collection.
    pub const DEFAULT_USERS_CSV: &str = "data/users.csv";
}

/// Constants used by the remote user API client.
pub mod remote {
    /// Remote endpoint queried when the local user collection is empty.
    pub const DEFAULT_USERS_API_URL: &str = "https://reqres.in/api/users";
    /// Global request timeout applied by the HTTP client.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// Prefix of the error reason reported for undecodable bodies.
    pub const BODY_PARSE_REASON: &str = "error parsing body response";
    /// Prefix of the error reason reported for unreadable bodies.
    pub const BODY_READ_REASON: &str = "error reading body response";
}

/// Constants used by the HTTP surface.
pub mod http {
    /// Default listen address.
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
    /// Default number of request-handling threads.
    pub const DEFAULT_HTTP_WORKERS: usize = 4;
    /// Content type attached to every response.
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    /// Body returned by the root route.
    pub const WELCOME_MESSAGE: &str = "Welcome to the roster API";
    /// Query parameter naming the filter criterion.
    pub const PARAM_TYPE: &str = "type";
    /// Query parameter naming the total number of items.
    pub const PARAM_ITEMS: &str = "items";
    /// Query parameter naming the per-worker quota.
    pub const PARAM_ITEMS_PER_WORKER: &str = "items_per_workers";
    /// Message returned for 500 responses.
    pub const MSG_INTERNAL_ERROR: &str = "Internal server error";
    /// Message returned for unknown routes.
    pub const MSG_ROUTE_NOT_FOUND: &str = "Route not found";
    /// Message returned for non-GET requests.
    pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";
    /// Message returned for a missing player.
    pub const MSG_PLAYER_NOT_FOUND: &str = "Player not found";
    /// Message returned for a missing user.
    pub const MSG_USER_NOT_FOUND: &str = "User not found";
    /// Message returned for a non-integer player id.
    pub const MSG_PLAYER_ID_NOT_INTEGER: &str = "Player ID provided must be of type integer";
    /// Message returned for a non-integer user id.
    pub const MSG_USER_ID_NOT_INTEGER: &str = "User ID provided must be of type integer";
    /// Message returned for an unrecognized filter criterion.
    pub const MSG_TYPE_NOT_ALLOWED: &str = "type param value is not allowed";
    /// Message returned for a bad `items` value.
    pub const MSG_ITEMS_NOT_POSITIVE: &str = "items param must be a positive integer";
    /// Message returned for a bad `items_per_workers` value.
    pub const MSG_ITEMS_PER_WORKER_NOT_POSITIVE: &str =
        "items_per_workers param must be a positive integer";
    /// Message returned when the per-worker quota exceeds the total.
    pub const MSG_ITEMS_PER_WORKER_TOO_LARGE: &str =
        "items_per_workers param must be less or equal items param";
}
