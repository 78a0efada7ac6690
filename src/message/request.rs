use http::Method;
use std::sync::Arc;
use url::Url;

use super::{header_line, HeaderVec};
use crate::router::RouteMatch;

/// Request facts consumed by the CORS pipeline
///
/// The transport adapter builds one of these per incoming request. `uri` must be
/// the absolute target URI (scheme, host, and port included) because cross-origin
/// detection compares it against the `Origin` header.
///
/// `route_match` is the attribute a routing stage attaches once it has resolved
/// the request. The CORS middleware must run before that stage and rejects
/// requests that already carry it.
#[derive(Debug, Clone)]
pub struct CorsRequest {
    /// HTTP method (GET, OPTIONS, etc.)
    pub method: Method,
    /// Absolute request URI
    pub uri: Url,
    /// Request headers (stack-allocated for ≤16 headers)
    pub headers: HeaderVec,
    /// Route already resolved by the pipeline, if any
    pub route_match: Option<RouteMatch>,
}

impl CorsRequest {
    /// Create a request without headers
    #[must_use]
    pub fn new(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            headers: HeaderVec::new(),
            route_match: None,
        }
    }

    /// Create a request from a URI string
    ///
    /// # Errors
    ///
    /// Returns the parser error if `uri` is not an absolute URL.
    pub fn parse(method: Method, uri: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(method, Url::parse(uri)?))
    }

    /// Builder-style header append
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((Arc::from(name), value.to_string()));
        self
    }

    /// Get the first value of a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `true` if the header is present, whatever its value
    #[inline]
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// All values of a header joined with `", "`; empty when absent
    #[must_use]
    pub fn header_line(&self, name: &str) -> String {
        header_line(&self.headers, name).unwrap_or_default()
    }
}

/// Synthesizes hypothetical requests used to probe the router
///
/// Probe requests are never sent anywhere; they only exist so that a
/// [`RouteMatcher`](crate::router::RouteMatcher) can be asked "would
/// `(method, uri)` match?".
pub trait RequestFactory: Send + Sync {
    fn create_request(&self, method: Method, uri: &Url) -> CorsRequest;
}

/// Default probe factory: method and URI only, no headers
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRequestFactory;

impl RequestFactory for DefaultRequestFactory {
    fn create_request(&self, method: Method, uri: &Url) -> CorsRequest {
        CorsRequest::new(method, uri.clone())
    }
}
