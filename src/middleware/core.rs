use crate::message::{CorsRequest, CorsResponse};
use crate::service::CorsError;

/// The next stage of the pipeline
///
/// Invoked at most once per real request. Closures taking a request and returning
/// a response implement it directly.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &CorsRequest) -> CorsResponse;
}

impl<F> Handler for F
where
    F: Fn(&CorsRequest) -> CorsResponse + Send + Sync,
{
    fn handle(&self, request: &CorsRequest) -> CorsResponse {
        self(request)
    }
}

/// A pipeline stage wrapping the next [`Handler`]
pub trait Middleware: Send + Sync {
    /// Process `request`, delegating to `handler` when appropriate
    ///
    /// # Errors
    ///
    /// Returns the fail-fast errors of the stage; ordinary outcomes are responses.
    fn process(&self, request: &CorsRequest, handler: &dyn Handler)
        -> Result<CorsResponse, CorsError>;
}
