use std::path::PathBuf;
use std::time::Duration;

use crate::constants::http::{DEFAULT_BIND_ADDR, DEFAULT_HTTP_WORKERS};
use crate::constants::records::{DEFAULT_PLAYERS_CSV, DEFAULT_USERS_CSV};
use crate::constants::remote::{DEFAULT_TIMEOUT_SECS, DEFAULT_USERS_API_URL};
use crate::constants::retrieval::DEFAULT_MAX_WORKERS;
use crate::errors::RosterError;

/// Tuning knobs for the concurrent filtered-retrieval engine.
#[derive(Clone, Debug)]
pub struct RetrievalConfig {
    /// Upper bound on concurrently running workers.
    ///
    /// When `ceil(total_items / items_per_worker)` exceeds this bound, the
    /// per-worker quota is raised so the capped pool can still drain every ticket.
    pub max_workers: usize,
    /// Return records sorted by identifier instead of worker completion order.
    pub sort_by_id: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            sort_by_id: true,
        }
    }
}

/// Top-level service configuration.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: String,
    /// Player collection (header row plus data rows).
    pub players_csv: PathBuf,
    /// User collection, created on the first remote fetch.
    pub users_csv: PathBuf,
    /// Remote endpoint queried when the local user collection is empty.
    pub users_api_url: String,
    /// Global timeout applied to remote requests.
    pub http_timeout: Duration,
    /// Number of threads pulling requests from the listener.
    pub http_workers: usize,
    /// Retrieval engine settings.
    pub retrieval: RetrievalConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            players_csv: PathBuf::from(DEFAULT_PLAYERS_CSV),
            users_csv: PathBuf::from(DEFAULT_USERS_CSV),
            users_api_url: DEFAULT_USERS_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http_workers: DEFAULT_HTTP_WORKERS,
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Reject settings that would leave the service unable to make progress.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.http_workers == 0 {
            return Err(RosterError::Configuration(
                "http_workers must be greater than zero".into(),
            ));
        }
        if self.retrieval.max_workers == 0 {
            return Err(RosterError::Configuration(
                "max_workers must be greater than zero".into(),
            ));
        }
        if self.http_timeout.is_zero() {
            return Err(RosterError::Configuration(
                "http_timeout must be greater than zero".into(),
            ));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(RosterError::Configuration("bind_addr is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.max_workers, DEFAULT_MAX_WORKERS);
        assert!(config.retrieval.sort_by_id);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn zero_counts_are_rejected() {
        let config = ServiceConfig {
            http_workers: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RosterError::Configuration(msg)) if msg.contains("http_workers")
        ));

        let mut config = ServiceConfig::default();
        config.retrieval.max_workers = 0;
        assert!(matches!(
            config.validate(),
            Err(RosterError::Configuration(msg)) if msg.contains("max_workers")
        ));

        let config = ServiceConfig {
            http_timeout: Duration::ZERO,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
