//! # strata
//!
//! A minimal, composable middleware pipeline for HTTP services behind a
//! reverse proxy. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The proxy does proxy things: TLS termination, slow-client protection,
//! body-size limits. strata does pipeline things: the ordered stack of
//! cross-cutting behaviors — timing, host filtering, rate limiting, metrics,
//! logging — that runs around your handlers. You write the handler; the
//! pipeline decides what happens before it, after it, and instead of it.
//!
//! Three ideas, composed:
//!
//! - **Handlers** — any `async fn(Request) -> impl IntoResponse` is a
//!   handler. No registration ceremony, no traits to implement.
//! - **Middleware** — a [`middleware::Middleware`] wraps the next handler
//!   and returns a new one: pre-process, short-circuit, or post-process.
//!   Registration order is priority order.
//! - **The router** — exact-path registry plus the middleware list, frozen
//!   into an immutable [`Dispatcher`] before the first request is served.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use strata::middleware::{HostFilter, Timing};
//! use strata::{Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .middleware(Timing::default())
//!         .middleware(HostFilter::new("example.com"))
//!         .on("/", greet);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn greet(_req: Request) -> Response {
//!     Response::text("hello")
//! }
//! ```
//!
//! A request for host `example.com` runs timing → host filter → `greet` and
//! unwinds back out. A request for any other host stops at the filter with a
//! 403 — `greet` never runs, and the timing middleware logs (but does not
//! measure) the rejection.

pub mod chain;
mod error;
mod handler;
pub mod health;
pub mod middleware;
mod request;
mod response;
mod router;
mod server;
mod status;

pub use error::{BoxError, Error};
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::{Dispatcher, Router};
pub use server::Server;
pub use status::Status;
