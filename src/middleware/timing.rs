//! Request timing middleware and the metrics collaborator it reports to.
//!
//! Register [`Timing`] **first** so its measurement brackets every inner
//! middleware and the handler — its timer starts before anything else runs
//! and stops after everything else has finished.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::BoxError;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;

// ── Metrics collaborator ──────────────────────────────────────────────────────

/// An external sink for `(label, duration)` measurements.
///
/// Injected into [`Timing`] explicitly — there is no global metrics
/// singleton, so a test can inject a recording sink and assert on exactly
/// what was reported. Reporting is fire-and-forget: an `Err` from `record`
/// is logged and the request completes untouched.
pub trait MetricsSink: Send + Sync + 'static {
    fn record(&self, label: &str, elapsed: Duration) -> Result<(), BoxError>;
}

/// The default sink: one structured log line per measurement, no backend.
///
/// Wire a real collector by implementing [`MetricsSink`] over its client and
/// passing that to [`Timing::new`].
pub struct LogMetrics;

impl MetricsSink for LogMetrics {
    fn record(&self, label: &str, elapsed: Duration) -> Result<(), BoxError> {
        info!(target: "strata::metrics", label, elapsed_us = elapsed.as_micros() as u64, "timing");
        Ok(())
    }
}

// ── Timing middleware ─────────────────────────────────────────────────────────

/// Measures each request and reports it, labelled by path.
///
/// Per completed request, exactly one log line is written. The metrics sink
/// only hears about responses with a status below 400: rejections
/// (short-circuits further down the chain) and failures are logged, not
/// measured.
pub struct Timing {
    sink: Arc<dyn MetricsSink>,
}

impl Timing {
    pub fn new(sink: impl MetricsSink) -> Self {
        Self { sink: Arc::new(sink) }
    }
}

/// `Timing::default()` reports through [`LogMetrics`].
impl Default for Timing {
    fn default() -> Self {
        Self::new(LogMetrics)
    }
}

impl Middleware for Timing {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let sink = Arc::clone(&self.sink);
        let handler = move |req: Request| {
            let sink = Arc::clone(&sink);
            let label = req.path().to_owned();
            let start = Instant::now();
            let fut = next.call(req);
            async move {
                let resp = fut.await;
                let elapsed = start.elapsed();
                let status = resp.status_code();
                if status < 400 {
                    if let Err(e) = sink.record(&label, elapsed) {
                        warn!(label = %label, error = %e, "metrics report failed");
                    }
                }
                info!(
                    path = %label,
                    status,
                    elapsed_us = elapsed.as_micros() as u64,
                    "request completed"
                );
                resp
            }
        };
        handler.into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain;
    use crate::response::Response;
    use crate::status::Status;
    use std::sync::Mutex;

    /// Records every report; optionally refuses them all.
    struct RecordingSink {
        reports: Mutex<Vec<(String, Duration)>>,
        fail: bool,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self { reports: Mutex::new(Vec::new()), fail: false })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { reports: Mutex::new(Vec::new()), fail: true })
        }
    }

    impl MetricsSink for Arc<RecordingSink> {
        fn record(&self, label: &str, elapsed: Duration) -> Result<(), BoxError> {
            if self.fail {
                return Err("collector unreachable".into());
            }
            self.reports.lock().unwrap().push((label.to_owned(), elapsed));
            Ok(())
        }
    }

    fn timed_chain(sink: Arc<RecordingSink>, terminal: BoxedHandler) -> BoxedHandler {
        let mws: Vec<Arc<dyn Middleware>> = vec![Arc::new(Timing::new(sink))];
        chain::compose(&mws, terminal)
    }

    #[tokio::test]
    async fn successful_requests_report_once_labelled_by_path() {
        let sink = RecordingSink::new();
        let chained = timed_chain(
            Arc::clone(&sink),
            (|_req: Request| async { Response::text("ok") }).into_boxed_handler(),
        );

        chained.call(Request::new("GET", "/users")).await;

        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "/users");
    }

    #[tokio::test]
    async fn rejections_and_failures_are_not_reported() {
        let sink = RecordingSink::new();
        let chained = timed_chain(
            Arc::clone(&sink),
            (|_req: Request| async { Status::Forbidden }).into_boxed_handler(),
        );

        let resp = chained.call(Request::new("GET", "/")).await;

        assert_eq!(resp.status_code(), 403);
        assert!(sink.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn a_failing_sink_never_fails_the_request() {
        let sink = RecordingSink::failing();
        let chained = timed_chain(
            sink,
            (|_req: Request| async { Response::text("still fine") }).into_boxed_handler(),
        );

        let resp = chained.call(Request::new("GET", "/")).await;

        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.body(), b"still fine");
    }
}
