//! Handler trait and type erasure.
//!
//! # Two views of a handler
//!
//! User code sees handlers as plain functions:
//!
//! ```text
//! async fn greet(req: Request) -> Response { … }
//! ```
//!
//! The pipeline sees handlers as values: the router stores one per route,
//! and every middleware receives the handler it wraps as its `next`
//! argument. Rust collections and trait methods need a single concrete type
//! for that, so the function is erased behind a [`BoxedHandler`]:
//!
//! ```text
//! greet.into_boxed_handler()                     ← Handler blanket impl
//!        ↓
//! BoxedHandler(Arc::new(FnHandler(greet)))       ← heap-allocated wrapper
//!        ↓
//! handler.call(req)  at request time             ← one vtable dispatch
//! ```
//!
//! The runtime cost per request is one virtual call per chain layer —
//! negligible next to network I/O.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future resolving to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place; `Send +
/// 'static` so tokio may move it across threads. The future owns everything
/// it needs — it never borrows from the handler that created it, which is
/// what lets a middleware return it without lifetime gymnastics.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface behind [`BoxedHandler`].
pub(crate) trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A shared, type-erased handler: one request in, one response out.
///
/// This is the unit the pipeline composes. The router stores one per route,
/// a [`Middleware`](crate::middleware::Middleware) receives the handler it
/// wraps as this type, and the chain it produces is again this type —
/// wrapped and terminal handlers are indistinguishable on purpose.
///
/// Cloning is an `Arc` clone: the same terminal handler may sit at the
/// bottom of several chains while concurrent requests run through all of
/// them.
#[derive(Clone)]
pub struct BoxedHandler {
    inner: Arc<dyn ErasedHandler + Send + Sync + 'static>,
}

impl BoxedHandler {
    /// Starts this handler on `req`, returning the future that produces the
    /// response.
    ///
    /// Takes the request **by value**. [`Request`] does not implement
    /// `Clone`, so a middleware holding one request can invoke its `next`
    /// handler at most once — the single-invocation rule is enforced by
    /// ownership, not by a runtime guard.
    pub fn call(&self, req: Request) -> BoxFuture {
        self.inner.call(req)
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it. This prevents accidental misuse and
/// keeps the API surface stable across versions.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

/// `Fn(Request) -> Fut` covers:
///   - named `async fn` items
///   - closures returning a future — which is how every built-in middleware
///     builds the handler it returns from `wrap`
///   - any struct that implements `Fn`
impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        BoxedHandler { inner: Arc::new(FnHandler(self)) }
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        // The concrete future is mapped through `IntoResponse` and boxed so
        // the return type matches the trait signature.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    async fn greet(_req: Request) -> Response {
        Response::text("hello")
    }

    #[tokio::test]
    async fn plain_async_fn_lifts_into_a_handler() {
        let handler = greet.into_boxed_handler();
        let resp = handler.call(Request::new("GET", "/")).await;
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.body(), b"hello");
    }

    #[tokio::test]
    async fn closures_and_bare_into_response_values_lift_too() {
        let handler = (|_req: Request| async { Status::NoContent }).into_boxed_handler();
        let resp = handler.call(Request::new("DELETE", "/users/1")).await;
        assert_eq!(resp.status_code(), 204);
        assert!(resp.body().is_empty());
    }
}
