//! Pipeline stages and the CORS middleware.
//!
//! [`CorsMiddleware`] sequences [`RequestClassifier`](crate::service::RequestClassifier),
//! [`PolicyResolver`](crate::service::PolicyResolver) and
//! [`ResponseRenderer`](crate::service::ResponseRenderer) and applies the
//! `Vary: Origin` contract. It must be placed before the routing stage.

mod core;
mod cors;
mod vary;

#[cfg(test)]
mod tests;

pub use core::{Handler, Middleware};
pub use cors::{CorsMiddleware, CorsOutcome};
pub use vary::vary;
