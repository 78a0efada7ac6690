//! # Router Module
//!
//! Route matching consumed by the CORS policy resolver.
//!
//! ## Overview
//!
//! The resolver treats routing as a black box behind the [`RouteMatcher`] trait:
//! given a (possibly hypothetical) request it answers with a [`RouteResult`] that
//! is either a success carrying the route's allowed methods and matched parameters,
//! or a failure.
//!
//! [`Router`] is the bundled implementation. It compiles path patterns such as
//! `/pets/{id}` into anchored regexes at startup and scans them longest-first for
//! each request. Each route carries a `defaults` parameter map; route-specific CORS
//! parameters live there under the `cors` key.
//!
//! ## Example
//!
//! ```rust
//! use brrtcors::router::{AllowedMethods, RouteMeta, Router};
//! use http::Method;
//! use serde_json::json;
//!
//! let router = Router::new(vec![
//!     RouteMeta::new("list_pets", "/pets", AllowedMethods::List(vec![Method::GET]))
//!         .with_default("cors", json!({ "allowed_origins": ["*"] })),
//! ])
//! .unwrap();
//!
//! let result = router.route(&Method::GET, "/pets");
//! assert!(result.is_success());
//! assert!(router.route(&Method::DELETE, "/pets").is_failure());
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{
    AllowedMethods, ParamVec, RouteMatch, RouteMatcher, RouteMeta, RouteResult, Router,
    MAX_INLINE_PARAMS,
};
