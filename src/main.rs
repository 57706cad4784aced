use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use roster::constants::http::{DEFAULT_BIND_ADDR, DEFAULT_HTTP_WORKERS};
use roster::constants::records::{DEFAULT_PLAYERS_CSV, DEFAULT_USERS_CSV};
use roster::constants::remote::{DEFAULT_TIMEOUT_SECS, DEFAULT_USERS_API_URL};
use roster::constants::retrieval::DEFAULT_MAX_WORKERS;
use roster::{
    CsvPlayerRepository, CsvUserRepository, HttpApiClient, HttpServer, PlayerService,
    RetrievalConfig, RetrievalEngine, Router, ServiceConfig, UserService,
};

#[derive(Debug, Parser)]
#[command(
    name = "roster",
    disable_help_subcommand = true,
    about = "Serve roster and user records over HTTP",
    long_about = "Serve the player roster (with concurrent filtered retrieval) and user profiles (with remote fallback) as JSON over HTTP.",
    after_help = "Set RUST_LOG (for example RUST_LOG=roster=debug) to control log output."
)]
struct Cli {
    #[arg(long = "bind", default_value = DEFAULT_BIND_ADDR, help = "Listen address")]
    bind_addr: String,
    #[arg(
        long = "players-csv",
        value_name = "PATH",
        default_value = DEFAULT_PLAYERS_CSV,
        help = "Player collection CSV (header row first)"
    )]
    players_csv: PathBuf,
    #[arg(
        long = "users-csv",
        value_name = "PATH",
        default_value = DEFAULT_USERS_CSV,
        help = "User collection CSV, written on first remote fetch"
    )]
    users_csv: PathBuf,
    #[arg(
        long = "users-api-url",
        default_value = DEFAULT_USERS_API_URL,
        help = "Remote endpoint used when the user collection is empty"
    )]
    users_api_url: String,
    #[arg(
        long = "http-timeout-secs",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Timeout for remote requests"
    )]
    http_timeout_secs: u64,
    #[arg(
        long = "http-workers",
        default_value_t = DEFAULT_HTTP_WORKERS,
        help = "Threads handling HTTP requests"
    )]
    http_workers: usize,
    #[arg(
        long = "max-workers",
        default_value_t = DEFAULT_MAX_WORKERS,
        help = "Upper bound on retrieval workers per request"
    )]
    max_workers: usize,
    #[arg(
        long = "unsorted",
        help = "Return filtered records in completion order instead of by id"
    )]
    unsorted: bool,
}

impl From<Cli> for ServiceConfig {
    fn from(cli: Cli) -> Self {
        ServiceConfig {
            bind_addr: cli.bind_addr,
            players_csv: cli.players_csv,
            users_csv: cli.users_csv,
            users_api_url: cli.users_api_url,
            http_timeout: Duration::from_secs(cli.http_timeout_secs),
            http_workers: cli.http_workers,
            retrieval: RetrievalConfig {
                max_workers: cli.max_workers,
                sort_by_id: !cli.unsorted,
            },
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = ServiceConfig::from(Cli::parse());
    config.validate()?;

    let engine = RetrievalEngine::new(config.retrieval.clone());
    let players = PlayerService::new(Arc::new(CsvPlayerRepository::new(
        &config.players_csv,
        engine,
    )));
    let users = UserService::new(
        Arc::new(CsvUserRepository::new(&config.users_csv)),
        Arc::new(HttpApiClient::new(config.http_timeout)),
        &config.users_api_url,
    );
    let router = Router::new(players, users);

    info!(
        players_csv = %config.players_csv.display(),
        users_csv = %config.users_csv.display(),
        users_api_url = %config.users_api_url,
        "starting roster service"
    );
    let server = HttpServer::bind(&config.bind_addr)?;
    server.run(&router, config.http_workers);
    Ok(())
}
