//! Minimal strata example — a greeting service with the full pipeline.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example pipeline
//!
//! Try:
//!   curl http://localhost:3000/                       # 200 "hello"
//!   curl -H 'host: other.com' http://localhost:3000/  # 403, handler never runs
//!   for i in $(seq 6); do curl -s -o /dev/null -w '%{http_code}\n' \
//!       http://localhost:3000/; done                  # the 6th answers 429
//!   curl http://localhost:3000/healthz

use std::time::Duration;

use strata::middleware::{HostFilter, RateLimit, Timing};
use strata::{Request, Response, Router, Server, health};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Registration order is execution order: timing brackets everything,
    // the host filter gates before any budget is spent.
    let app = Router::new()
        .middleware(Timing::default())
        .middleware(HostFilter::new("localhost"))
        .middleware(RateLimit::new(5, Duration::from_secs(10)))
        .on("/", greet)
        .on("/users", list_users)
        .on("/healthz", health::liveness)
        .on("/readyz", health::readiness);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

async fn greet(_req: Request) -> Response {
    Response::text("hello")
}

// Response::json takes Vec<u8> — pass bytes from your serialiser:
//   serde_json:  Response::json(serde_json::to_vec(&users)?)
//   hand-built:  Response::json(format!(...).into_bytes())
async fn list_users(_req: Request) -> Response {
    Response::json(br#"[{"id":1,"name":"alice"}]"#.to_vec())
}
