//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: timing, host filtering, rate limiting, metrics
//! reporting, structured logging. A middleware attaches to the router once
//! and applies to every registered route — the terminal handlers never know
//! it is there.
//!
//! # The contract
//!
//! A middleware is a handler *transformer*: [`wrap`](Middleware::wrap) takes
//! the next handler in line and returns a new handler around it. Composition
//! is pure — `wrap` itself must not invoke `next`. Only the handler `wrap`
//! returned may do that, once it is invoked with an actual request, and then
//! at most once per request:
//!
//! 1. **Pre-processing** — read the request, start a timer, check a
//!    precondition.
//! 2. **The decision** — invoke `next`, or **short-circuit**: produce a
//!    terminal response without calling `next` at all. Short-circuiting is
//!    the sole rejection mechanism in this model (host mismatch → 403,
//!    budget exhausted → 429).
//! 3. **Post-processing** — runs only when `next` returned normally, with
//!    everything that is now known: elapsed time, response status.
//!
//! Calling `next` more than once cannot be expressed: `call` consumes the
//! [`Request`], and `Request` is not `Clone`.
//!
//! # Ordering
//!
//! Registration order is priority order. The first middleware registered is
//! outermost: it sees the rawest request first on the way in and the final
//! response last on the way out. Register access control first so nothing
//! runs before it; register timing first so its measurement brackets every
//! inner middleware. Swapping two registrations changes observable behavior.
//! See [`chain`](crate::chain) for the fold that makes this so.
//!
//! # Built-ins
//!
//! - [`Timing`] — per-request latency, one log line per completed request,
//!   reports to an injected [`MetricsSink`]
//! - [`HostFilter`] — rejects requests for hosts you don't serve
//! - [`RateLimit`] — fixed-window request budget
//! - [`from_fn`] — lift a closure into a middleware for one-off concerns

mod host;
mod rate_limit;
mod timing;

pub use host::HostFilter;
pub use rate_limit::RateLimit;
pub use timing::{LogMetrics, MetricsSink, Timing};

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::IntoResponse;

/// A transformation of one handler into another.
///
/// Object-safe so the router can hold an ordered `Vec` of heterogeneous
/// middlewares. Implementations are immutable once registered and are shared
/// across every route and every concurrent request; per-request state
/// belongs in the closure `wrap` returns, shared state behind the
/// middleware's own `Arc`.
///
/// ```rust
/// use strata::middleware::Middleware;
/// use strata::{BoxedHandler, Handler, Request};
///
/// struct Passthrough;
///
/// impl Middleware for Passthrough {
///     fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
///         let handler = move |req: Request| {
///             let next = next.clone();
///             async move {
///                 // pre-processing goes here
///                 let resp = next.call(req).await;
///                 // post-processing goes here
///                 resp
///             }
///         };
///         handler.into_boxed_handler()
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Returns a handler that runs this middleware around `next`.
    ///
    /// Must not invoke `next` — composition is inert until a request
    /// arrives. A middleware must not care whether `next` is a terminal
    /// handler or an already-wrapped chain; the two are indistinguishable
    /// by design.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

// ── Function middlewares ──────────────────────────────────────────────────────

/// Lifts a closure into a [`Middleware`].
///
/// For cross-cutting concerns too small to deserve a struct:
///
/// ```rust
/// use strata::middleware::from_fn;
/// use strata::{BoxedHandler, Request, Router};
///
/// let _app = Router::new()
///     .middleware(from_fn(|req: Request, next: BoxedHandler| async move {
///         tracing::info!(path = %req.path(), "request received");
///         next.call(req).await
///     }));
/// ```
pub fn from_fn<F, Fut, R>(f: F) -> FnMiddleware<F>
where
    F: Fn(Request, BoxedHandler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FnMiddleware { f: Arc::new(f) }
}

/// A [`Middleware`] backed by a plain function. Built with [`from_fn`].
pub struct FnMiddleware<F> {
    // Arc because `wrap` hands a copy of the function to every chain it
    // participates in.
    f: Arc<F>,
}

impl<F, Fut, R> Middleware for FnMiddleware<F>
where
    F: Fn(Request, BoxedHandler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let f = Arc::clone(&self.f);
        let handler = move |req: Request| (*f)(req, next.clone());
        handler.into_boxed_handler()
    }
}
