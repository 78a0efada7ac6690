use std::fmt;

use crate::configuration::CorsConfigError;

/// Errors raised while running the CORS pipeline
///
/// Only the genuinely exceptional paths are errors. "Not a CORS request",
/// "no matching route" and "unauthorized origin" are ordinary outcomes and never
/// surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsError {
    /// The `Origin` header is present but cannot be parsed as a URI
    ///
    /// Request-level failure: the middleware boundary turns it into a 400 response.
    InvalidOrigin {
        /// Raw header value
        origin: String,
        /// Parser message
        reason: String,
    },
    /// The request already carries a resolved route
    ///
    /// The CORS middleware was wired after the routing stage. This is a deployment
    /// bug and is never converted into a response.
    PipelineMisconfigured,
    /// The requested method is outside the CORS method vocabulary
    UnsupportedMethod {
        /// The rejected method
        method: String,
    },
    /// The matched route's `cors` parameter is not a map
    MalformedRouteParameters {
        /// Name of the offending route
        route: String,
    },
    /// A route or project policy failed to build
    Configuration(CorsConfigError),
}

impl fmt::Display for CorsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsError::InvalidOrigin { origin, .. } => {
                write!(f, "Provided Origin \"{}\" is invalid.", origin)
            }
            CorsError::PipelineMisconfigured => {
                write!(
                    f,
                    "Please re-configure your pipeline. It seems that the CORS middleware is \
                    placed after the routing middleware. The CORS middleware has to be placed \
                    before the routing middleware."
                )
            }
            CorsError::UnsupportedMethod { method } => {
                write!(f, "Request method '{}' is not a CORS request method", method)
            }
            CorsError::MalformedRouteParameters { route } => {
                write!(
                    f,
                    "Route '{}' carries a 'cors' parameter that is not a map",
                    route
                )
            }
            CorsError::Configuration(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CorsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorsError::Configuration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CorsConfigError> for CorsError {
    fn from(err: CorsConfigError) -> Self {
        CorsError::Configuration(err)
    }
}
