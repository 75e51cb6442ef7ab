//! Rate limiting middleware.
//!
//! A fixed-window budget: at most `limit` requests per `window`, counted
//! across every route the router serves. Once the budget is spent the
//! middleware short-circuits with `429 Too Many Requests` and a
//! `retry-after` header until the window rolls over.
//!
//! Push limits to the proxy when you can; this middleware is for limits the
//! proxy cannot see — a budget shared by a group of routes, or a service
//! deployed without one.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Admits at most `limit` requests per `window`, globally.
///
/// One instance owns one window. The router composes a separate chain per
/// route, but every chain shares this instance's counter, so the budget
/// spans all of them.
#[derive(Clone)]
pub struct RateLimit {
    limit: u32,
    window: Duration,
    state: Arc<Mutex<Window>>,
}

struct Window {
    opened: Instant,
    served: u32,
}

impl RateLimit {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Arc::new(Mutex::new(Window { opened: Instant::now(), served: 0 })),
        }
    }

    /// `Ok` admits the request; `Err` carries the time until the window
    /// rolls over. The lock is released before anything awaits.
    fn admit(&self) -> Result<(), Duration> {
        let mut w = self.state.lock().expect("rate limit window poisoned");
        if w.opened.elapsed() >= self.window {
            w.opened = Instant::now();
            w.served = 0;
        }
        if w.served < self.limit {
            w.served += 1;
            Ok(())
        } else {
            Err(self.window.saturating_sub(w.opened.elapsed()))
        }
    }
}

impl Middleware for RateLimit {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let limiter = self.clone();
        let handler = move |req: Request| -> BoxFuture {
            match limiter.admit() {
                Ok(()) => next.call(req),
                Err(retry_after) => {
                    debug!(path = req.path(), "rate limit exceeded");
                    let secs = retry_after.as_secs().max(1).to_string();
                    Box::pin(async move {
                        Response::builder()
                            .status(Status::TooManyRequests)
                            .header("retry-after", &secs)
                            .no_body()
                    })
                }
            }
        };
        handler.into_boxed_handler()
    }
}
