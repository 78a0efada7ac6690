//! # Configuration Module
//!
//! CORS policy value types and their merge semantics.
//!
//! ## Overview
//!
//! Two variants share the [`Configuration`] capability set:
//!
//! - **[`ProjectConfiguration`]** - the process-wide policy, built once at startup from
//!   the static configuration file and shared read-only across requests
//! - **[`RouteConfiguration`]** - a per-request policy derived from matched route
//!   parameters, carrying the `overrides_project_configuration` and `explicit` flags
//!
//! Both are immutable: every operation that "changes" a configuration
//! ([`RouteConfiguration::with_request_methods`],
//! [`RouteConfiguration::merge_with_configuration`]) returns a new instance.
//!
//! ## Recognized Parameters
//!
//! ```yaml
//! cors:
//!   allowed_origins: ["https://*.example.com"]   # or allowedOrigins
//!   allowed_methods: [GET, POST]                 # project level only
//!   allowed_headers: [Content-Type, Authorization]
//!   allowed_max_age: "3600"                      # "-1" disables preflight caching
//!   credentials_allowed: true
//!   exposed_headers: [X-Total-Count]
//! ```
//!
//! Route parameters (read from the matched route under the `cors` key) accept the same
//! keys except `allowed_methods`, plus `overrides_project_configuration` and `explicit`.
//! Unknown keys fail construction with [`CorsConfigError::InvalidParameters`].

mod error;
mod origin;
mod params;
mod policy;
mod project;
mod route;


pub use error::CorsConfigError;
pub use origin::OriginPattern;
pub use params::{ProjectParameters, RouteParameters};
pub use project::ProjectConfiguration;
pub use route::RouteConfiguration;

use http::Method;

/// Origin pattern that authorizes every origin and displaces any enumerated list
pub const ANY_ORIGIN: &str = "*";

/// `allowed_max_age` sentinel meaning "preflight caching disabled / unset"
pub const PREFLIGHT_CACHE_DISABLED: &str = "-1";

/// Key under which route-specific CORS parameters live in matched route parameters
pub const PARAMETER_IDENTIFIER: &str = "cors";

/// Top-level key of the static configuration source holding the project policy
pub const CONFIGURATION_IDENTIFIER: &str = "cors";

/// Read access to one CORS policy
///
/// Implemented by both [`ProjectConfiguration`] and [`RouteConfiguration`] so that
/// merging and rendering can accept either variant.
pub trait Configuration: Send + Sync {
    /// Origin patterns: exact origins, shell-style globs, or exactly `["*"]`
    fn allowed_origins(&self) -> &[String];
    /// [`allowed_origins`](Self::allowed_origins), compiled for matching
    fn origin_patterns(&self) -> &[OriginPattern];
    /// Allowed methods, deduplicated and sorted ascending
    fn allowed_methods(&self) -> &[Method];
    /// Allowed request headers in merge order
    fn allowed_headers(&self) -> &[String];
    /// Preflight cache duration in seconds, or [`PREFLIGHT_CACHE_DISABLED`]
    fn allowed_max_age(&self) -> &str;
    /// Response headers exposed to scripts, in merge order
    fn exposed_headers(&self) -> &[String];
    /// Whether `Access-Control-Allow-Credentials: true` is emitted
    fn credentials_allowed(&self) -> bool;
}
