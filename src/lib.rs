//! # brrtcors
//!
//! **brrtcors** is route-aware CORS policy middleware. Instead of applying one
//! global policy, it asks the application's router which routes the requested URI
//! would hit under *every* HTTP method and merges the project-wide policy with
//! each matching route's own policy.
//!
//! ## Architecture
//!
//! - **[`configuration`]** - immutable policy values ([`ProjectConfiguration`],
//!   [`RouteConfiguration`]) and their merge rules
//! - **[`message`]** - request facts and response values exchanged with the transport
//! - **[`router`]** - the [`RouteMatcher`] seam and a bundled regex [`Router`]
//! - **[`service`]** - classification, policy resolution, origin authorization,
//!   and header rendering
//! - **[`middleware`]** - [`CorsMiddleware`], which sequences the services and
//!   applies the `Vary: Origin` contract
//! - **[`config`]** - static configuration files (project policy and route table)
//! - **[`otel`]** - structured logging initialization
//! - **[`cli`]** - the `brrtcors` binary
//!
//! ## Request Flow
//!
//! ```text
//! request ──► RequestClassifier ──► not cross-origin ──► handler ──► + Vary: Origin
//!                   │
//!                   ▼ CorsMetadata
//!             PolicyResolver ──► probe router for DELETE, GET, HEAD, OPTIONS,
//!                   │            PATCH, POST, PUT, TRACE (requested method first)
//!                   │
//!                   ├─► no route ────────────► handler (404 as usual)
//!                   ├─► preflight ───────────► 204 + Access-Control-Allow-*
//!                   ├─► origin rejected ─────► 403
//!                   └─► origin authorized ───► handler ──► + Access-Control-* + Vary
//! ```
//!
//! ## Example
//!
//! ```rust
//! use brrtcors::{CorsMiddleware, Middleware, ProjectConfiguration};
//! use brrtcors::message::{CorsRequest, CorsResponse};
//! use brrtcors::router::{AllowedMethods, RouteMeta, Router};
//! use http::Method;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let router = Router::new(vec![
//!     RouteMeta::new("create_pet", "/pets", AllowedMethods::List(vec![Method::POST]))
//!         .with_default("cors", json!({ "allowed_origins": ["https://*.example.com"] })),
//! ])
//! .unwrap();
//! let cors = CorsMiddleware::with_router(ProjectConfiguration::default(), Arc::new(router));
//!
//! let preflight = CorsRequest::parse(Method::OPTIONS, "https://api.example.com/pets")
//!     .unwrap()
//!     .with_header("Origin", "https://app.example.com")
//!     .with_header("Access-Control-Request-Method", "POST");
//! let handler = |_: &CorsRequest| CorsResponse::empty(404);
//!
//! let response = cors.process(&preflight, &handler).unwrap();
//! assert_eq!(response.status, 204);
//! assert_eq!(response.get_header("Access-Control-Allow-Methods"), Some("POST"));
//! ```
//!
//! ## Concurrency
//!
//! Every component is immutable after construction; a single [`CorsMiddleware`]
//! can serve concurrent requests without locks. Router probes within one request
//! run sequentially so an explicit route found early ends the search.

pub mod cli;
pub mod config;
pub mod configuration;
pub mod message;
pub mod middleware;
pub mod otel;
pub mod router;
pub mod service;

pub use configuration::{Configuration, ProjectConfiguration, RouteConfiguration};
pub use middleware::{CorsMiddleware, CorsOutcome, Handler, Middleware};
pub use router::{RouteMatcher, Router};
pub use service::CorsError;
