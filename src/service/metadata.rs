use http::Method;
use std::fmt;
use url::Url;

use super::CorsError;
use crate::configuration::{Configuration, ANY_ORIGIN};

/// Methods a CORS request may ask for, in canonical probing order
pub const ALLOWED_REQUEST_METHODS: [Method; 8] = [
    Method::DELETE,
    Method::GET,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
    Method::TRACE,
];

/// Origin value signalling "not authorized"
pub const UNAUTHORIZED_ORIGIN: &str = "null";

/// The `Origin` a browser sent
///
/// Sandboxed iframes, `file:` documents and cross-origin redirects send the
/// literal `null`. Such a request is always cross-origin and never authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOrigin {
    /// `Origin: null`
    Opaque,
    /// A parsed origin URI
    Url(Url),
}

impl From<Url> for RequestOrigin {
    fn from(url: Url) -> Self {
        RequestOrigin::Url(url)
    }
}

impl fmt::Display for RequestOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestOrigin::Opaque => f.write_str(UNAUTHORIZED_ORIGIN),
            RequestOrigin::Url(url) => f.write_str(&serialize_origin(url)),
        }
    }
}

/// Facts about one cross-origin request
///
/// For a preflight, `requested_uri` is the target resource and `requested_method`
/// comes from `Access-Control-Request-Method`; otherwise both describe the request
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsMetadata {
    pub origin: RequestOrigin,
    pub requested_uri: Url,
    pub requested_method: Method,
}

impl CorsMetadata {
    /// # Errors
    ///
    /// Returns [`CorsError::UnsupportedMethod`] when `requested_method` is not one
    /// of [`ALLOWED_REQUEST_METHODS`].
    pub fn new(
        origin: impl Into<RequestOrigin>,
        requested_uri: Url,
        requested_method: Method,
    ) -> Result<Self, CorsError> {
        if !ALLOWED_REQUEST_METHODS.contains(&requested_method) {
            return Err(CorsError::UnsupportedMethod {
                method: requested_method.to_string(),
            });
        }
        Ok(Self {
            origin: origin.into(),
            requested_uri,
            requested_method,
        })
    }

    /// The requesting origin as sent by the browser, e.g. `https://app.example.com`
    #[must_use]
    pub fn origin_string(&self) -> String {
        self.origin.to_string()
    }

    /// The origin to echo in `Access-Control-Allow-Origin`, if `configuration`
    /// authorizes it
    ///
    /// A `*` entry echoes the requesting origin verbatim rather than `*`, so
    /// credentialed requests keep working. Other entries are shell-style globs.
    /// An opaque origin is never authorized.
    #[must_use]
    pub fn authorized_origin(&self, configuration: &dyn Configuration) -> Option<String> {
        if self.origin == RequestOrigin::Opaque {
            return None;
        }
        let origin = self.origin_string();

        if configuration
            .allowed_origins()
            .iter()
            .any(|pattern| pattern == ANY_ORIGIN)
        {
            return Some(origin);
        }

        configuration
            .origin_patterns()
            .iter()
            .any(|pattern| pattern.matches(&origin))
            .then_some(origin)
    }

    /// [`authorized_origin`](Self::authorized_origin), or [`UNAUTHORIZED_ORIGIN`]
    #[must_use]
    pub fn origin_for(&self, configuration: &dyn Configuration) -> String {
        self.authorized_origin(configuration)
            .unwrap_or_else(|| UNAUTHORIZED_ORIGIN.to_string())
    }
}

/// Serialize an origin URI without the trailing root slash `Url` adds
pub(crate) fn serialize_origin(origin: &Url) -> String {
    let tuple = origin.origin();
    if tuple.is_tuple() {
        tuple.ascii_serialization()
    } else {
        origin.as_str().trim_end_matches('/').to_string()
    }
}
