use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::{CorsError, CorsMetadata, ALLOWED_REQUEST_METHODS};
use crate::configuration::{ProjectConfiguration, RouteConfiguration, PARAMETER_IDENTIFIER};
use crate::message::RequestFactory;
use crate::router::{AllowedMethods, RouteMatcher, RouteResult};

/// Decides which CORS policy applies to a cross-origin request
///
/// The resolver probes the router with a hypothetical request for every method of
/// the CORS vocabulary (the requested method first) and folds the policies of all
/// matching routes into a baseline seeded from the project policy. A route that
/// turns out to be explicit ends the search and is returned alone.
pub struct PolicyResolver {
    configuration: Arc<ProjectConfiguration>,
    request_factory: Arc<dyn RequestFactory>,
    router: Arc<dyn RouteMatcher>,
}

impl PolicyResolver {
    pub fn new(
        configuration: Arc<ProjectConfiguration>,
        request_factory: Arc<dyn RequestFactory>,
        router: Arc<dyn RouteMatcher>,
    ) -> Self {
        Self {
            configuration,
            request_factory,
            router,
        }
    }

    /// The project policy every route policy is merged with
    #[must_use]
    pub fn project_configuration(&self) -> &ProjectConfiguration {
        &self.configuration
    }

    /// Resolve the policy for `metadata`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(config))` - the explicit route policy, or the baseline merged with
    ///   every matching route
    /// * `Ok(None)` - no route matches the URI for any method
    ///
    /// # Errors
    ///
    /// Propagates malformed route parameters and invalid route policies.
    pub fn locate(&self, metadata: &CorsMetadata) -> Result<Option<RouteConfiguration>, CorsError> {
        let mut configuration =
            RouteConfiguration::default().merge_with_configuration(self.configuration.as_ref());
        let mut any_route_matched = false;

        for method in probe_order(&metadata.requested_method) {
            let probe = self
                .request_factory
                .create_request(method.clone(), &metadata.requested_uri);
            let result = self.router.match_request(&probe);
            if result.is_failure() {
                continue;
            }

            any_route_matched = true;
            let route_configuration = self.configuration_from_route(&result)?;

            if route_configuration.explicit() {
                info!(
                    method = %method,
                    uri = %metadata.requested_uri,
                    route = result.route_name().unwrap_or_default(),
                    "Explicit CORS route, skipping remaining probes"
                );
                return Ok(Some(route_configuration));
            }

            debug!(
                method = %method,
                route = result.route_name().unwrap_or_default(),
                "Merging route CORS policy"
            );
            configuration = configuration.merge_with_configuration(&route_configuration);
        }

        if !any_route_matched {
            debug!(uri = %metadata.requested_uri, "No route matches for any method");
            return Ok(None);
        }

        Ok(Some(configuration))
    }

    fn configuration_from_route(
        &self,
        result: &RouteResult,
    ) -> Result<RouteConfiguration, CorsError> {
        let allowed_methods = match result.allowed_methods() {
            Some(AllowedMethods::List(methods)) => methods,
            Some(AllowedMethods::Any) | None => ALLOWED_REQUEST_METHODS.to_vec(),
        };
        let explicit = is_full_vocabulary(&allowed_methods);

        let params = result.matched_params();
        let route_parameters = match params.get(PARAMETER_IDENTIFIER) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                return Err(CorsError::MalformedRouteParameters {
                    route: result.route_name().unwrap_or_default().to_string(),
                })
            }
        };

        let Some(mut route_parameters) = route_parameters else {
            return Ok(RouteConfiguration::with_explicit(explicit)
                .merge_with_configuration(self.configuration.as_ref())
                .with_request_methods(&allowed_methods));
        };

        // a declared `explicit` wins over the derived one
        route_parameters
            .entry("explicit")
            .or_insert(Value::Bool(explicit));

        let route_configuration = RouteConfiguration::from_value(&Value::Object(route_parameters))?
            .with_request_methods(&allowed_methods);

        if route_configuration.overrides_project_configuration() {
            return Ok(route_configuration);
        }

        Ok(route_configuration.merge_with_configuration(self.configuration.as_ref()))
    }
}

/// The requested method, then the rest of the vocabulary in canonical order
fn probe_order(requested: &Method) -> Vec<Method> {
    std::iter::once(requested.clone())
        .chain(ALLOWED_REQUEST_METHODS.into_iter().filter(|m| m != requested))
        .collect()
}

/// `true` if `methods` covers exactly the CORS vocabulary
fn is_full_vocabulary(methods: &[Method]) -> bool {
    ALLOWED_REQUEST_METHODS
        .iter()
        .all(|candidate| methods.contains(candidate))
        && methods.iter().all(|m| ALLOWED_REQUEST_METHODS.contains(m))
}
