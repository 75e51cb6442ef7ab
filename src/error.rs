//! Unified error type.

use std::fmt;
use std::net::SocketAddr;

/// A boxed error for collaborator interfaces, e.g.
/// [`MetricsSink::record`](crate::middleware::MetricsSink::record).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by strata's fallible operations.
///
/// Request-level outcomes (404, 403, 500, …) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s — the pipeline
/// always answers. This type surfaces the one infrastructure failure the
/// caller can act on: the listener could not bind.
#[derive(Debug)]
pub struct Error {
    addr: SocketAddr,
    source: std::io::Error,
}

impl Error {
    pub(crate) fn bind(addr: SocketAddr, source: std::io::Error) -> Self {
        Self { addr, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to bind {}: {}", self.addr, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
