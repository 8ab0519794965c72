//! Engine-level request envelope
//!
//! The engine is handed a method, an absolute URL and a header set; it never
//! inspects application-level payload semantics.

use url::Url;

/// An intercepted outbound request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Uppercase HTTP method
    pub method: String,
    /// Absolute request URL
    pub url: Url,
    /// Header set as sent by the application
    pub headers: Vec<(String, String)>,
}

impl Request {
    // == Constructors ==
    /// Creates a GET request with no headers.
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            headers: Vec::new(),
        }
    }

    /// Creates a request with an explicit method.
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url,
            headers: Vec::new(),
        }
    }

    /// Adds a header, builder style.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    // == Cache Key ==
    /// Full request identity used as the cache key: method + absolute URL.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    // == Header Lookup ==
    /// Returns the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    // == Navigation Detection ==
    /// True if this request is a top-level document load.
    ///
    /// Keys on the fetch metadata headers when present, with an Accept
    /// fallback for clients that do not send them.
    pub fn is_navigation(&self) -> bool {
        if self.method != "GET" {
            return false;
        }
        if let Some(mode) = self.header("sec-fetch-mode") {
            return mode.eq_ignore_ascii_case("navigate");
        }
        if let Some(dest) = self.header("sec-fetch-dest") {
            return dest.eq_ignore_ascii_case("document");
        }
        self.header("accept")
            .map(|a| a.starts_with("text/html"))
            .unwrap_or(false)
    }
}
