//! Route registry and dispatch.
//!
//! Two types, one per lifecycle phase:
//!
//! - [`Router`] is the **setup phase**: register middlewares and routes,
//!   single-threaded, by-value chaining.
//! - [`Dispatcher`] is the **serve phase**: immutable, shared behind `Arc`
//!   across every connection task, the only type that can dispatch.
//!
//! [`Router::finish`] is the boundary. It composes the middleware chain for
//! every route exactly once and consumes the router, so chains are memoized
//! with the middleware list provably frozen — late registration is a compile
//! error, not a data race.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::chain;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router, in its mutable setup phase.
///
/// Build it once at startup; every method consumes and returns `self` so
/// registrations chain naturally. Pass the finished router to
/// [`Server::serve`](crate::Server::serve), which freezes it.
pub struct Router {
    middlewares: Vec<Arc<dyn Middleware>>,
    routes: HashMap<String, BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { middlewares: Vec::new(), routes: HashMap::new() }
    }

    /// Appends a middleware to the chain applied to every route.
    ///
    /// Registration order is priority order: the first middleware registered
    /// runs first on the way in and last on the way out. See the
    /// [`middleware`](crate::middleware) module docs.
    pub fn middleware(mut self, mw: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(mw));
        self
    }

    /// Registers a handler for an exact path.
    ///
    /// Paths are matched literally — `/users` and `/users/` are different
    /// routes, and there are no patterns or parameters. Registering the same
    /// path twice replaces the earlier handler: **last registration wins**.
    ///
    /// ```rust,no_run
    /// # use strata::{Request, Response, Router};
    /// # async fn list_users(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on("/users", list_users)
    ///     .on("/users/new", create_user);
    /// ```
    pub fn on(mut self, path: &str, handler: impl Handler) -> Self {
        self.routes.insert(path.to_owned(), handler.into_boxed_handler());
        self
    }

    /// Freezes the router into a [`Dispatcher`].
    ///
    /// Composes the middleware chain around every registered route's
    /// terminal handler, once. After this point neither the middleware list
    /// nor the route map can change.
    pub fn finish(self) -> Dispatcher {
        let Router { middlewares, routes } = self;
        let chains = routes
            .into_iter()
            .map(|(path, terminal)| (path, chain::compose(&middlewares, terminal)))
            .collect();
        Dispatcher { chains }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// The frozen router: a read-only map from path to composed chain.
///
/// Safe to share across concurrent request tasks; dispatching takes `&self`
/// and touches no mutable state.
pub struct Dispatcher {
    chains: HashMap<String, BoxedHandler>,
}

impl Dispatcher {
    /// Routes one request to its chain and runs it to completion.
    ///
    /// A request for an unregistered path answers `404 Not Found` without
    /// entering any middleware: chains are composed per route, and an
    /// unknown route has no chain. A request is always answered — never
    /// dropped, never a panic.
    pub async fn dispatch(&self, req: Request) -> Response {
        match self.chains.get(req.path()) {
            Some(chained) => chained.call(req).await,
            None => {
                debug!(path = req.path(), "no route");
                Response::status(Status::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::from_fn;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(calls: Arc<AtomicUsize>, body: &'static str) -> impl Handler {
        move |_req: Request| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Response::text(body)
            }
        }
    }

    #[tokio::test]
    async fn routes_are_isolated() {
        let a_calls = Arc::new(AtomicUsize::new(0));
        let b_calls = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .on("/a", counting_handler(Arc::clone(&a_calls), "a"))
            .on("/b", counting_handler(Arc::clone(&b_calls), "b"))
            .finish();

        let resp = app.dispatch(Request::new("GET", "/a")).await;

        assert_eq!(resp.body(), b"a");
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .on("/a", counting_handler(Arc::clone(&first), "first"))
            .on("/a", counting_handler(Arc::clone(&second), "second"))
            .finish();

        let resp = app.dispatch(Request::new("GET", "/a")).await;

        assert_eq!(resp.body(), b"second");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_routes_answer_404_without_entering_middleware() {
        let entered: Arc<Mutex<Vec<String>>> = Arc::default();

        let seen = Arc::clone(&entered);
        let app = Router::new()
            .middleware(from_fn(move |req: Request, next: BoxedHandler| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(req.path().to_owned());
                    next.call(req).await
                }
            }))
            .on("/known", |_req: Request| async { Response::text("known") })
            .finish();

        let resp = app.dispatch(Request::new("GET", "/missing")).await;

        assert_eq!(resp.status_code(), 404);
        assert!(entered.lock().unwrap().is_empty());

        // The registered route still runs through the middleware.
        app.dispatch(Request::new("GET", "/known")).await;
        assert_eq!(*entered.lock().unwrap(), vec!["/known"]);
    }

    #[tokio::test]
    async fn middlewares_apply_to_every_route() {
        let entered: Arc<Mutex<Vec<String>>> = Arc::default();

        let seen = Arc::clone(&entered);
        let app = Router::new()
            .middleware(from_fn(move |req: Request, next: BoxedHandler| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(req.path().to_owned());
                    next.call(req).await
                }
            }))
            .on("/a", |_req: Request| async { Response::text("a") })
            .on("/b", |_req: Request| async { Response::text("b") })
            .finish();

        app.dispatch(Request::new("GET", "/a")).await;
        app.dispatch(Request::new("GET", "/b")).await;

        let mut seen = entered.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["/a", "/b"]);
    }
}
