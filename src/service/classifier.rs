use http::Method;
use tracing::debug;
use url::Url;

use super::{CorsError, CorsMetadata, RequestOrigin, UNAUTHORIZED_ORIGIN};
use crate::message::CorsRequest;

/// Header carrying the method a preflight asks about
pub const ACCESS_CONTROL_REQUEST_METHOD: &str = "access-control-request-method";

/// Classifies requests from headers alone, before any routing happens
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestClassifier;

impl RequestClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// `true` if the request carries an `Origin` whose scheme, host, or port
    /// differs from the request URI
    ///
    /// A missing or blank `Origin` means a same-origin or non-browser client; an
    /// opaque `null` origin is always cross-origin.
    ///
    /// # Errors
    ///
    /// Returns [`CorsError::InvalidOrigin`] if `Origin` is present but unparsable.
    pub fn is_cross_origin(&self, request: &CorsRequest) -> Result<bool, CorsError> {
        let origin = match parse_origin(request)? {
            None => return Ok(false),
            Some(RequestOrigin::Opaque) => {
                debug!(uri = %request.uri, "Opaque origin, treating as cross-origin");
                return Ok(true);
            }
            Some(RequestOrigin::Url(origin)) => origin,
        };

        let uri = &request.uri;
        let cross_origin = uri.scheme() != origin.scheme()
            || uri.port_or_known_default() != origin.port_or_known_default()
            || uri.host_str() != origin.host_str();

        debug!(
            origin = %origin,
            uri = %uri,
            cross_origin,
            "Classified request origin"
        );

        Ok(cross_origin)
    }

    /// `true` for a cross-origin `OPTIONS` request carrying
    /// `Access-Control-Request-Method` (its value is not inspected)
    ///
    /// # Errors
    ///
    /// Same as [`is_cross_origin`](Self::is_cross_origin).
    pub fn is_preflight(&self, request: &CorsRequest) -> Result<bool, CorsError> {
        Ok(self.is_cross_origin(request)?
            && request.method.as_str().eq_ignore_ascii_case(Method::OPTIONS.as_str())
            && request.has_header(ACCESS_CONTROL_REQUEST_METHOD))
    }

    /// Extract the [`CorsMetadata`] of a cross-origin request
    ///
    /// The requested method is `Access-Control-Request-Method` when set and non-empty,
    /// otherwise the request's own method, uppercased.
    ///
    /// # Errors
    ///
    /// - [`CorsError::InvalidOrigin`] if `Origin` is missing, blank, or unparsable
    /// - [`CorsError::UnsupportedMethod`] if the requested method is outside the
    ///   CORS vocabulary
    pub fn build_metadata(&self, request: &CorsRequest) -> Result<CorsMetadata, CorsError> {
        let origin = parse_origin(request)?.ok_or_else(|| CorsError::InvalidOrigin {
            origin: String::new(),
            reason: "missing Origin header".to_string(),
        })?;

        let requested = request.header_line(ACCESS_CONTROL_REQUEST_METHOD);
        let requested = requested.trim();
        let requested = if requested.is_empty() {
            request.method.as_str().to_ascii_uppercase()
        } else {
            requested.to_ascii_uppercase()
        };

        let method =
            Method::from_bytes(requested.as_bytes()).map_err(|_| CorsError::UnsupportedMethod {
                method: requested.clone(),
            })?;

        CorsMetadata::new(origin, request.uri.clone(), method)
    }
}

fn parse_origin(request: &CorsRequest) -> Result<Option<RequestOrigin>, CorsError> {
    let raw = request.header_line("origin");
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed == UNAUTHORIZED_ORIGIN {
        return Ok(Some(RequestOrigin::Opaque));
    }

    Url::parse(trimmed)
        .map(|url| Some(RequestOrigin::Url(url)))
        .map_err(|e| CorsError::InvalidOrigin {
            origin: raw.clone(),
            reason: e.to_string(),
        })
}
