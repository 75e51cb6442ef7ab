//! Host filtering middleware.
//!
//! A proxy normally pins the `host` header before traffic reaches the
//! service; [`HostFilter`] is the backstop for traffic that arrives some
//! other way. Register it ahead of anything that does real work — a request
//! for the wrong host should touch nothing.

use tracing::debug;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Short-circuits any request whose `host` header does not name this
/// service.
///
/// Matching ignores ASCII case and a trailing `:port`. A request without a
/// `host` header is rejected too — an unnamed request is not one of ours.
/// Rejections are `403 Forbidden` and never reach the next handler.
pub struct HostFilter {
    allowed: String,
}

impl HostFilter {
    /// `allowed` is the bare host name to serve, e.g. `"example.com"`.
    pub fn new(allowed: impl Into<String>) -> Self {
        Self { allowed: allowed.into() }
    }
}

impl Middleware for HostFilter {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let allowed = self.allowed.clone();
        let handler = move |req: Request| -> BoxFuture {
            let permitted = req.host().is_some_and(|h| host_matches(h, &allowed));
            if permitted {
                next.call(req)
            } else {
                debug!(
                    host = req.host().unwrap_or("-"),
                    path = req.path(),
                    "host rejected"
                );
                Box::pin(async { Response::status(Status::Forbidden) })
            }
        };
        handler.into_boxed_handler()
    }
}

/// `host` as sent on the wire, `allowed` as configured. The wire form may
/// carry a port.
fn host_matches(host: &str, allowed: &str) -> bool {
    let bare = match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    };
    bare.eq_ignore_ascii_case(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn filtered_chain(allowed: &str, calls: &Arc<AtomicUsize>) -> BoxedHandler {
        let calls = Arc::clone(calls);
        let terminal = (move |_req: Request| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Response::text("hello")
            }
        })
        .into_boxed_handler();
        let mws: Vec<Arc<dyn Middleware>> = vec![Arc::new(HostFilter::new(allowed))];
        chain::compose(&mws, terminal)
    }

    #[tokio::test]
    async fn matching_host_passes_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chained = filtered_chain("example.com", &calls);

        let resp = chained
            .call(Request::new("GET", "/").with_header("host", "example.com"))
            .await;

        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.body(), b"hello");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn mismatched_or_missing_host_is_rejected_before_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chained = filtered_chain("example.com", &calls);

        let other = chained
            .call(Request::new("GET", "/").with_header("host", "other.com"))
            .await;
        assert_eq!(other.status_code(), 403);

        let unnamed = chained.call(Request::new("GET", "/")).await;
        assert_eq!(unnamed.status_code(), 403);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn matching_ignores_case_and_port() {
        assert!(host_matches("Example.COM", "example.com"));
        assert!(host_matches("example.com:8443", "example.com"));
        assert!(!host_matches("example.com.evil.io", "example.com"));
        assert!(!host_matches("example.com:", "example.com"));
    }
}
