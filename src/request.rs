//! Incoming request type.

/// One incoming request, as seen by middleware and handlers.
///
/// The transport edge builds a `Request` from the wire; tests and tools
/// build one directly with [`Request::new`]. Either way the value is owned
/// by exactly one dispatch from start to finish.
///
/// `Request` is deliberately **not** `Clone`. Invoking a handler consumes
/// the request, so the only way to call `next` twice inside a middleware
/// would be to manufacture a second request from scratch.
pub struct Request {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Appends a header. Builder-style, for tests and the transport edge.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The route key: the exact request path, e.g. `"/users"`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The value of the `host` header, if the client sent one.
    pub fn host(&self) -> Option<&str> {
        self.header("host")
    }
}
