use http::Method;
use serde_json::Value;

use super::params::ProjectParameters;
use super::policy::{parse_methods, Policy};
use super::{Configuration, CorsConfigError, OriginPattern};

/// Process-wide CORS policy
///
/// Built once at startup from the static configuration source and then shared
/// read-only (typically behind an `Arc`) by every concurrent request.
///
/// # Example
///
/// ```rust
/// use brrtcors::configuration::{Configuration, ProjectConfiguration};
/// use serde_json::json;
///
/// let project = ProjectConfiguration::from_value(&json!({
///     "allowed_origins": ["https://*.example.com"],
///     "allowedHeaders": ["Content-Type"],
///     "allowed_max_age": "600",
/// }))
/// .unwrap();
///
/// assert_eq!(project.allowed_max_age(), "600");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfiguration {
    policy: Policy,
}

impl ProjectConfiguration {
    /// Build the project policy from typed parameters
    ///
    /// # Errors
    ///
    /// Returns [`CorsConfigError`] for empty list entries, a non-numeric max age,
    /// or an `allowed_methods` entry that is not an HTTP method token.
    pub fn new(parameters: ProjectParameters) -> Result<Self, CorsConfigError> {
        let methods = parse_methods(&parameters.allowed_methods)?;
        let policy = Policy::build(
            parameters.allowed_origins,
            methods,
            parameters.allowed_headers,
            parameters.allowed_max_age,
            parameters.credentials_allowed,
            parameters.exposed_headers,
        )?;
        Ok(Self { policy })
    }

    /// Build the project policy from an untyped parameter map
    ///
    /// `null` yields the empty default policy.
    ///
    /// # Errors
    ///
    /// Returns [`CorsConfigError::InvalidParameters`] when the map contains an
    /// unknown key or a value of the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, CorsConfigError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let parameters: ProjectParameters =
            serde_json::from_value(value.clone()).map_err(|e| {
                CorsConfigError::InvalidParameters {
                    message: e.to_string(),
                }
            })?;
        Self::new(parameters)
    }
}

impl Configuration for ProjectConfiguration {
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
