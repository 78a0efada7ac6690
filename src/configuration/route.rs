use http::Method;
use serde_json::Value;

use super::params::RouteParameters;
use super::policy::Policy;
use super::{Configuration, CorsConfigError, OriginPattern};

/// Route-level CORS policy
///
/// Constructed per resolution attempt from matched route parameters and never
/// retained beyond one request. Both "mutators" return new instances.
///
/// - `overrides_project_configuration` (default `true`): a route policy is used as-is;
///   when `false` it is merged on top of the project policy
/// - `explicit` (default `false`): the route is the sole source of truth and
///   resolution stops at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfiguration {
    policy: Policy,
    overrides_project_configuration: bool,
    explicit: bool,
}

impl Default for RouteConfiguration {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            overrides_project_configuration: true,
            explicit: false,
        }
    }
}

impl RouteConfiguration {
    /// Build a route policy from typed parameters
    ///
    /// # Errors
    ///
    /// Returns [`CorsConfigError`] for empty list entries or a non-numeric max age.
    pub fn new(parameters: RouteParameters) -> Result<Self, CorsConfigError> {
        let policy = Policy::build(
            parameters.allowed_origins,
            Vec::new(),
            parameters.allowed_headers,
            parameters.allowed_max_age,
            parameters.credentials_allowed,
            parameters.exposed_headers,
        )?;
        Ok(Self {
            policy,
            overrides_project_configuration: parameters.overrides_project_configuration,
            explicit: parameters.explicit,
        })
    }

    /// Build a route policy from the map found under the `cors` route parameter
    ///
    /// # Errors
    ///
    /// Returns [`CorsConfigError::InvalidParameters`] naming any unknown key.
    pub fn from_value(value: &Value) -> Result<Self, CorsConfigError> {
        let parameters: RouteParameters =
            serde_json::from_value(value.clone()).map_err(|e| {
                CorsConfigError::InvalidParameters {
                    message: e.to_string(),
                }
            })?;
        Self::new(parameters)
    }

    /// A bare route policy carrying only the `explicit` flag
    #[must_use]
    pub fn with_explicit(explicit: bool) -> Self {
        Self {
            explicit,
            ..Self::default()
        }
    }

    /// `true` if this policy replaces the project policy instead of merging with it
    #[must_use]
    pub fn overrides_project_configuration(&self) -> bool {
        self.overrides_project_configuration
    }

    /// `true` if no other route or project policy may be merged into this one
    #[must_use]
    pub fn explicit(&self) -> bool {
        self.explicit
    }

    /// Return a copy whose methods are the union of the current methods and `methods`
    ///
    /// The result is deduplicated and sorted ascending, so repeated application is
    /// order-independent:
    ///
    /// ```rust
    /// use brrtcors::configuration::{Configuration, RouteConfiguration};
    /// use http::Method;
    ///
    /// let config = RouteConfiguration::default()
    ///     .with_request_methods(&[Method::POST])
    ///     .with_request_methods(&[Method::GET, Method::POST]);
    ///
    /// assert_eq!(config.allowed_methods(), &[Method::GET, Method::POST]);
    /// ```
    #[must_use]
    pub fn with_request_methods(&self, methods: &[Method]) -> Self {
        Self {
            policy: self.policy.with_methods(methods),
            overrides_project_configuration: self.overrides_project_configuration,
            explicit: self.explicit,
        }
    }

    /// Merge a lower-precedence configuration into a copy of this one
    ///
    /// # Rules
    ///
    /// - Merging is idempotent: merging a configuration with itself, or with an
    ///   equal one, returns an unchanged copy
    /// - `credentials_allowed`: adopted from `other` unless already `true`
    /// - `allowed_max_age`: adopted from `other` only while still unset
    /// - headers and origins: `other`'s entries first, then ours, deduplicated
    ///   (origins collapse to `["*"]` when the wildcard appears)
    /// - methods: union, deduplicated and sorted ascending
    /// - the route flags are kept from `self`
    #[must_use]
    pub fn merge_with_configuration(&self, other: &dyn Configuration) -> Self {
        Self {
            policy: self.policy.merged_with(other),
            overrides_project_configuration: self.overrides_project_configuration,
            explicit: self.explicit,
        }
    }
}

impl Configuration for RouteConfiguration {
    fn allowed_origins(&self) -> &[String] {
        &self.policy.allowed_origins
    }

    fn origin_patterns(&self) -> &[OriginPattern] {
        &self.policy.origin_patterns
    }

    fn allowed_methods(&self) -> &[Method] {
        &self.policy.allowed_methods
    }

    fn allowed_headers(&self) -> &[String] {
        &self.policy.allowed_headers
    }

    fn allowed_max_age(&self) -> &str {
        &self.policy.allowed_max_age
    }

    fn exposed_headers(&self) -> &[String] {
        &self.policy.exposed_headers
    }

    fn credentials_allowed(&self) -> bool {
        self.policy.credentials_allowed
    }
}
