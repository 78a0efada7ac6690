use std::sync::Arc;

use tracing::{debug, info, warn};

use super::vary::vary;
use super::{Handler, Middleware};
use crate::configuration::{ProjectConfiguration, RouteConfiguration};
use crate::message::{CorsRequest, CorsResponse, DefaultRequestFactory};
use crate::router::RouteMatcher;
use crate::service::{CorsError, PolicyResolver, RequestClassifier, ResponseRenderer};

/// What the CORS middleware decided for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOutcome {
    /// Same-origin or non-browser request: forward, then add `Vary: Origin`
    NotCors,
    /// Cross-origin, but no route exists for the URI under any method: forward
    NoRoute,
    /// The resolved policy rejects the origin: respond 403 without calling the handler
    Unauthorized {
        /// The rejected origin
        origin: String,
    },
    /// Preflight with a resolved policy: respond 204 without calling the handler
    Preflight {
        /// Value for `Access-Control-Allow-Origin` (`"null"` when unauthorized)
        origin: String,
        configuration: RouteConfiguration,
    },
    /// Authorized simple request: forward, then annotate the response
    Authorized {
        /// Value for `Access-Control-Allow-Origin`
        origin: String,
        configuration: RouteConfiguration,
    },
}

/// CORS policy middleware
///
/// Must run before the routing stage: it probes the router itself, once per
/// method, instead of relying on the pipeline's single resolved route.
///
/// # Request Flow
///
/// 1. A request that already carries a route match fails with
///    [`CorsError::PipelineMisconfigured`]
/// 2. Not cross-origin: forward, then add `Vary: Origin`
/// 3. Preflight: resolve the policy and answer 204 directly; forward if no route
/// 4. Simple request: resolve the policy, reject unauthorized origins with 403,
///    otherwise forward and annotate the response with CORS headers and `Vary: Origin`
///
/// # Example
///
/// ```rust
/// use brrtcors::configuration::ProjectConfiguration;
/// use brrtcors::message::{CorsRequest, CorsResponse};
/// use brrtcors::middleware::{CorsMiddleware, Middleware};
/// use brrtcors::router::{AllowedMethods, RouteMeta, Router};
/// use http::Method;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let router = Router::new(vec![RouteMeta::new(
///     "list_pets",
///     "/pets",
///     AllowedMethods::List(vec![Method::GET]),
/// )])
/// .unwrap();
/// let project = ProjectConfiguration::from_value(&json!({ "allowed_origins": ["*"] })).unwrap();
/// let cors = CorsMiddleware::with_router(project, Arc::new(router));
///
/// let request = CorsRequest::parse(Method::GET, "https://api.example.com/pets")
///     .unwrap()
///     .with_header("Origin", "https://app.example.com");
/// let handler = |_: &CorsRequest| CorsResponse::json(200, json!([]));
///
/// let response = cors.process(&request, &handler).unwrap();
/// assert_eq!(
///     response.get_header("Access-Control-Allow-Origin"),
///     Some("https://app.example.com")
/// );
/// ```
pub struct CorsMiddleware {
    classifier: RequestClassifier,
    resolver: PolicyResolver,
    renderer: ResponseRenderer,
}

impl CorsMiddleware {
    pub fn new(
        classifier: RequestClassifier,
        resolver: PolicyResolver,
        renderer: ResponseRenderer,
    ) -> Self {
        Self {
            classifier,
            resolver,
            renderer,
        }
    }

    /// Wire the default classifier, probe factory, and renderer around `router`
    pub fn with_router(configuration: ProjectConfiguration, router: Arc<dyn RouteMatcher>) -> Self {
        Self::new(
            RequestClassifier::new(),
            PolicyResolver::new(
                Arc::new(configuration),
                Arc::new(DefaultRequestFactory),
                router,
            ),
            ResponseRenderer::new(),
        )
    }

    /// Decide the outcome for `request` without invoking any handler
    ///
    /// # Errors
    ///
    /// - [`CorsError::PipelineMisconfigured`] if the request already carries a route
    /// - [`CorsError::InvalidOrigin`] if the `Origin` header does not parse
    /// - any resolution error from [`PolicyResolver::locate`]
    pub fn evaluate(&self, request: &CorsRequest) -> Result<CorsOutcome, CorsError> {
        if request.route_match.is_some() {
            return Err(CorsError::PipelineMisconfigured);
        }

        if !self.classifier.is_cross_origin(request)? {
            return Ok(CorsOutcome::NotCors);
        }

        let metadata = self.classifier.build_metadata(request)?;
        let Some(configuration) = self.resolver.locate(&metadata)? else {
            return Ok(CorsOutcome::NoRoute);
        };

        if self.classifier.is_preflight(request)? {
            return Ok(CorsOutcome::Preflight {
                origin: metadata.origin_for(&configuration),
                configuration,
            });
        }

        match metadata.authorized_origin(&configuration) {
            Some(origin) => Ok(CorsOutcome::Authorized {
                origin,
                configuration,
            }),
            None => Ok(CorsOutcome::Unauthorized {
                origin: metadata.origin_string(),
            }),
        }
    }

    /// Outermost boundary: like [`Middleware::process`], but an unparsable `Origin`
    /// becomes a 400 response instead of an error
    ///
    /// # Errors
    ///
    /// Every error of [`evaluate`](Self::evaluate) except
    /// [`CorsError::InvalidOrigin`].
    pub fn handle(
        &self,
        request: &CorsRequest,
        handler: &dyn Handler,
    ) -> Result<CorsResponse, CorsError> {
        match self.process(request, handler) {
            Err(CorsError::InvalidOrigin { origin, reason }) => {
                warn!(origin = %origin, reason = %reason, "Rejecting request with invalid Origin");
                Ok(self.renderer.invalid_origin(&origin))
            }
            other => other,
        }
    }
}

impl Middleware for CorsMiddleware {
    fn process(
        &self,
        request: &CorsRequest,
        handler: &dyn Handler,
    ) -> Result<CorsResponse, CorsError> {
        let outcome = self.evaluate(request)?;

        match outcome {
            CorsOutcome::NotCors => Ok(vary(handler.handle(request))),
            CorsOutcome::NoRoute => {
                debug!(uri = %request.uri, "No CORS policy, deferring to handler");
                Ok(vary(handler.handle(request)))
            }
            CorsOutcome::Unauthorized { origin } => {
                info!(origin = %origin, uri = %request.uri, "CORS origin not authorized");
                Ok(self.renderer.unauthorized(&origin))
            }
            CorsOutcome::Preflight {
                origin,
                configuration,
            } => {
                debug!(origin = %origin, uri = %request.uri, "Answering CORS preflight");
                Ok(self.renderer.preflight(&origin, &configuration))
            }
            CorsOutcome::Authorized {
                origin,
                configuration,
            } => {
                let response = handler.handle(request);
                Ok(vary(self.renderer.cors(response, &origin, &configuration)))
            }
        }
    }
}
