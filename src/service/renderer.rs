use http::Method;

use crate::configuration::Configuration;
use crate::message::CorsResponse;

pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const ACCESS_CONTROL_MAX_AGE: &str = "Access-Control-Max-Age";
pub const ACCESS_CONTROL_ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const ACCESS_CONTROL_EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";

/// Turns a resolved policy into response headers
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Successful preflight: `204 No Content` with the allow-* headers
    ///
    /// # Headers Added
    ///
    /// - `Content-Length: 0`
    /// - `Access-Control-Allow-Origin`: `origin` as given
    /// - `Access-Control-Allow-Methods`: comma-separated policy methods
    /// - `Access-Control-Allow-Headers`: comma-separated policy headers
    /// - `Access-Control-Max-Age`: policy max age (`-1` when caching is disabled)
    /// - `Access-Control-Allow-Credentials: true` if credentials are allowed
    #[must_use]
    pub fn preflight(&self, origin: &str, configuration: &dyn Configuration) -> CorsResponse {
        let methods = configuration
            .allowed_methods()
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let response = CorsResponse::empty(204)
            .with_header("Content-Length", "0")
            .with_header(ACCESS_CONTROL_ALLOW_ORIGIN, origin)
            .with_header(ACCESS_CONTROL_ALLOW_METHODS, methods)
            .with_header(
                ACCESS_CONTROL_ALLOW_HEADERS,
                configuration.allowed_headers().join(", "),
            )
            .with_header(ACCESS_CONTROL_MAX_AGE, configuration.allowed_max_age());

        with_credentials(response, configuration)
    }

    /// Annotate a downstream response with the origin and exposed headers
    #[must_use]
    pub fn cors(
        &self,
        response: CorsResponse,
        origin: &str,
        configuration: &dyn Configuration,
    ) -> CorsResponse {
        let response = response
            .with_header(ACCESS_CONTROL_ALLOW_ORIGIN, origin)
            .with_header(
                ACCESS_CONTROL_EXPOSE_HEADERS,
                configuration.exposed_headers().join(", "),
            );

        with_credentials(response, configuration)
    }

    /// `403 Forbidden` without any CORS header
    #[must_use]
    pub fn unauthorized(&self, origin: &str) -> CorsResponse {
        CorsResponse::error(403, &format!("The origin \"{origin}\" is not authorized"))
    }

    /// `400 Bad Request` for an `Origin` header that does not parse
    #[must_use]
    pub fn invalid_origin(&self, origin: &str) -> CorsResponse {
        CorsResponse::error(400, &format!("Provided Origin \"{origin}\" is invalid."))
    }
}

fn with_credentials(response: CorsResponse, configuration: &dyn Configuration) -> CorsResponse {
    if configuration.credentials_allowed() {
        response.with_header(ACCESS_CONTROL_ALLOW_CREDENTIALS, "true")
    } else {
        response
    }
}
