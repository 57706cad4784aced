use std::net::SocketAddr;
use std::thread;
use std::time::Instant;

use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, info, warn};

use crate::api::router::Router;
use crate::constants::http::CONTENT_TYPE_JSON;
use crate::errors::RosterError;

/// Blocking HTTP listener that hands requests to a `Router`.
pub struct HttpServer {
    inner: Server,
}

impl HttpServer {
    /// Bind `addr` (for example `0.0.0.0:8080`, or port `0` for an ephemeral port).
    pub fn bind(addr: &str) -> Result<Self, RosterError> {
        let inner = Server::http(addr).map_err(|err| {
            RosterError::Configuration(format!("failed to bind '{addr}': {err}"))
        })?;
        Ok(Self { inner })
    }

    /// Bound socket address, when listening on TCP.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.server_addr().to_ip()
    }

    /// Serve requests on `workers` threads until `unblock` has been called once per worker.
    pub fn run(&self, router: &Router, workers: usize) {
        info!(addr = ?self.local_addr(), workers, "http server listening");
        thread::scope(|scope| {
            for worker_id in 0..workers.max(1) {
                scope.spawn(move || {
                    for request in self.inner.incoming_requests() {
                        respond(worker_id, router, request);
                    }
                    debug!(worker_id, "http worker stopped");
                });
            }
        });
    }

    /// Wake one worker blocked on the listener so it can exit.
    pub fn unblock(&self) {
        self.inner.unblock();
    }
}

fn respond(worker_id: usize, router: &Router, request: Request) {
    let started = Instant::now();
    let method = request.method().as_str().to_string();
    let url = request.url().to_string();
    let api_response = router.handle(&method, &url);
    debug!(
        worker_id,
        method = %method,
        url = %url,
        status = api_response.status,
        elapsed_ms = started.elapsed().as_millis(),
        "request handled"
    );
    let response = Response::from_string(api_response.body_string())
        .with_status_code(api_response.status)
        .with_header(json_content_type());
    if let Err(err) = request.respond(response) {
        warn!(worker_id, url = %url, error = %err, "failed to write response");
    }
}

fn json_content_type() -> Header {
    Header::from_bytes(&b"Content-Type"[..], CONTENT_TYPE_JSON.as_bytes())
        .expect("static content-type header is valid")
}
