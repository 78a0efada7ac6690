//! # Service Module
//!
//! The CORS decision engine: classification, policy resolution, and rendering.
//!
//! ## Flow
//!
//! 1. [`RequestClassifier`] decides from headers alone whether a request is
//!    cross-origin and whether it is a preflight, then extracts [`CorsMetadata`]
//! 2. [`PolicyResolver`] probes the router with every method of
//!    [`ALLOWED_REQUEST_METHODS`] (the requested method first) and merges the
//!    project policy with each matching route's policy
//! 3. [`CorsMetadata::authorized_origin`] checks the requesting origin against the
//!    resolved policy
//! 4. [`ResponseRenderer`] turns the outcome into headers
//!
//! None of these types hold mutable state; one instance of each serves every
//! request concurrently.

mod classifier;
mod error;
mod metadata;
mod renderer;
mod resolver;


pub use classifier::{RequestClassifier, ACCESS_CONTROL_REQUEST_METHOD};
pub use error::CorsError;
pub use metadata::{CorsMetadata, RequestOrigin, ALLOWED_REQUEST_METHODS, UNAUTHORIZED_ORIGIN};
pub use renderer::{
    ResponseRenderer, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    ACCESS_CONTROL_MAX_AGE,
};
pub use resolver::PolicyResolver;
