//! HTTP surface: routing and validation (`router`) and the listener loop (`server`).

mod router;
mod server;

pub use router::{ApiResponse, Router};
pub use server::HttpServer;
