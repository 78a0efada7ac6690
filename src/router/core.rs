//! Router core module - route matching for real and probe requests.

use http::Method;
use regex::Regex;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

use crate::message::CorsRequest;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated path parameter storage.
///
/// Param names use `Arc<str>` because they come from the route table built at
/// startup; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Methods a route accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedMethods {
    /// Catch-all route: every method is accepted
    Any,
    /// Only the listed methods are accepted
    List(Vec<Method>),
}

impl AllowedMethods {
    /// `true` if `method` is accepted
    #[must_use]
    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            AllowedMethods::Any => true,
            AllowedMethods::List(methods) => methods.contains(method),
        }
    }
}

/// Static description of one route
#[derive(Debug, Clone)]
pub struct RouteMeta {
    /// Route name (handler name)
    pub name: String,
    /// Path pattern, e.g. `/users/{user_id}/posts`
    pub path_pattern: String,
    /// Accepted methods
    pub methods: AllowedMethods,
    /// Default parameters merged into every match (CORS options live under `cors`)
    pub defaults: Map<String, Value>,
}

impl RouteMeta {
    #[must_use]
    pub fn new(name: &str, path_pattern: &str, methods: AllowedMethods) -> Self {
        Self {
            name: name.to_string(),
            path_pattern: path_pattern.to_string(),
            methods,
            defaults: Map::new(),
        }
    }

    /// Builder-style default parameter
    #[must_use]
    pub fn with_default(mut self, key: &str, value: Value) -> Self {
        self.defaults.insert(key.to_string(), value);
        self
    }
}

/// Result of successfully matching a request to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (Arc to avoid expensive clones)
    pub route: Arc<RouteMeta>,
    /// Path parameters extracted from the URL (e.g., `{id}` → `{"id": "123"}`)
    pub path_params: ParamVec,
    /// Name of the matched route
    pub handler_name: String,
}

impl RouteMatch {
    /// Get a path parameter by name ("last write wins" on duplicates)
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Route defaults overlaid with the extracted path parameters
    #[must_use]
    pub fn matched_params(&self) -> Map<String, Value> {
        let mut params = self.route.defaults.clone();
        for (name, value) in &self.path_params {
            params.insert(name.to_string(), Value::String(value.clone()));
        }
        params
    }
}

/// Answer of a [`RouteMatcher`] for one request
#[derive(Debug, Clone)]
pub enum RouteResult {
    /// A route accepts the request
    Success(RouteMatch),
    /// The path exists but not for this method
    MethodFailure {
        /// Methods the path does accept
        allowed_methods: Vec<Method>,
    },
    /// No route matches the path
    NotFound,
}

impl RouteResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, RouteResult::Success(_))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Methods accepted by the matched route
    ///
    /// `None` for [`RouteResult::NotFound`].
    #[must_use]
    pub fn allowed_methods(&self) -> Option<AllowedMethods> {
        match self {
            RouteResult::Success(m) => Some(m.route.methods.clone()),
            RouteResult::MethodFailure { allowed_methods } => {
                Some(AllowedMethods::List(allowed_methods.clone()))
            }
            RouteResult::NotFound => None,
        }
    }

    /// Parameters of the matched route; empty on failure
    #[must_use]
    pub fn matched_params(&self) -> Map<String, Value> {
        match self {
            RouteResult::Success(m) => m.matched_params(),
            _ => Map::new(),
        }
    }

    /// Name of the matched route, if any
    #[must_use]
    pub fn route_name(&self) -> Option<&str> {
        match self {
            RouteResult::Success(m) => Some(m.handler_name.as_str()),
            _ => None,
        }
    }
}

/// Route matching capability consumed by the CORS resolver
///
/// Implementations must be synchronous and side-effect free: the resolver calls
/// them several times per request with hypothetical requests.
pub trait RouteMatcher: Send + Sync {
    fn match_request(&self, request: &CorsRequest) -> RouteResult;
}

/// Regex-based router
///
/// Routes are compiled once and scanned longest pattern first so that overlapping
/// paths such as `/pets` and `/pets/{id}` resolve to the most specific one.
#[derive(Clone)]
pub struct Router {
    /// compiled regex, meta, param names
    routes: Vec<(Regex, Arc<RouteMeta>, Vec<Arc<str>>)>,
}

impl Router {
    /// Compile a route table
    ///
    /// # Errors
    ///
    /// Returns the regex error if a path pattern cannot be compiled.
    pub fn new(routes: Vec<RouteMeta>) -> Result<Self, regex::Error> {
        let mut routes = routes;
        routes.sort_by_key(|r| std::cmp::Reverse(r.path_pattern.len()));

        let routes = routes
            .into_iter()
            .map(|route| {
                let (regex, param_names) = Self::path_to_regex(&route.path_pattern)?;
                Ok((regex, Arc::new(route), param_names))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        info!(routes_count = routes.len(), "Routing table loaded");

        Ok(Self { routes })
    }

    /// Registered routes, longest pattern first
    pub fn routes(&self) -> impl Iterator<Item = &RouteMeta> {
        self.routes.iter().map(|(_, meta, _)| meta.as_ref())
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for (_re, meta, _params) in &self.routes {
            let methods = match &meta.methods {
                AllowedMethods::Any => "*".to_string(),
                AllowedMethods::List(list) => list
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            };
            println!("[route] {methods} {} -> {}", meta.path_pattern, meta.name);
        }
    }

    /// Match a method and path against the table
    ///
    /// # Returns
    ///
    /// * `RouteResult::Success` - the first route whose pattern and methods match
    /// * `RouteResult::MethodFailure` - the path matched, but only for other methods
    /// * `RouteResult::NotFound` - no pattern matched
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> RouteResult {
        let mut path_allows: Vec<Method> = Vec::new();

        for (regex, route, param_names) in &self.routes {
            let Some(captures) = regex.captures(path) else {
                continue;
            };

            if !route.methods.accepts(method) {
                if let AllowedMethods::List(methods) = &route.methods {
                    path_allows.extend(methods.iter().cloned());
                }
                continue;
            }

            let mut params = ParamVec::new();
            for (i, name) in param_names.iter().enumerate() {
                if let Some(val) = captures.get(i + 1) {
                    params.push((Arc::clone(name), val.as_str().to_string()));
                }
            }

            debug!(
                method = %method,
                path = %path,
                handler_name = %route.name,
                route_pattern = %route.path_pattern,
                "Route matched"
            );

            return RouteResult::Success(RouteMatch {
                route: Arc::clone(route),
                path_params: params,
                handler_name: route.name.clone(),
            });
        }

        if path_allows.is_empty() {
            debug!(method = %method, path = %path, "No route matched");
            RouteResult::NotFound
        } else {
            debug!(method = %method, path = %path, allowed = ?path_allows, "Method not allowed");
            RouteResult::MethodFailure {
                allowed_methods: path_allows,
            }
        }
    }

    /// Convert a path pattern to an anchored regex and extract parameter names
    ///
    /// Transforms `/users/{id}` into `^/users/([^/]+)$` with params `["id"]`.
    /// Literal segments are escaped.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<Arc<str>>), regex::Error> {
        if path == "/" || path.is_empty() {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let param_name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                param_names.push(Arc::from(param_name));
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        Ok((Regex::new(&pattern)?, param_names))
    }
}

impl RouteMatcher for Router {
    fn match_request(&self, request: &CorsRequest) -> RouteResult {
        self.route(&request.method, request.uri.path())
    }
}
