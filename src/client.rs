use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::constants::remote::{BODY_PARSE_REASON, BODY_READ_REASON};
use crate::errors::RosterError;

/// Remote JSON fetch capability.
///
/// Services receive an implementation explicitly; there is no process-wide
/// client instance.
pub trait ApiClient: Send + Sync {
    /// GET `url` and decode the body as JSON.
    fn get_json(&self, url: &str) -> Result<Value, RosterError>;
}

/// `ApiClient` backed by a `ureq` agent with a global request timeout.
pub struct HttpApiClient {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpApiClient {
    /// Client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            timeout,
        }
    }

    /// Configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ApiClient for HttpApiClient {
    fn get_json(&self, url: &str) -> Result<Value, RosterError> {
        let remote_error = |reason: String| RosterError::Remote {
            url: url.to_string(),
            reason,
        };
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| remote_error(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| remote_error(format!("{BODY_READ_REASON}: {err}")))?;
        debug!(url, status, bytes = body.len(), "remote response received");
        serde_json::from_str(&body).map_err(|err| remote_error(format!("{BODY_PARSE_REASON}: {err}")))
    }
}
