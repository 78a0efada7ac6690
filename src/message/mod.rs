//! Request and response values exchanged with the CORS pipeline.
//!
//! [`CorsRequest`] is the small set of request facts the middleware needs (method,
//! absolute target URI, headers, and whether routing already ran). [`CorsResponse`]
//! is the status/headers/body triple handed back to the transport layer.
//!
//! Headers live in a [`HeaderVec`] so the common case never touches the heap.

mod request;
mod response;

pub use request::{CorsRequest, DefaultRequestFactory, RequestFactory};
pub use response::CorsResponse;

use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage
///
/// Header names use `Arc<str>` so that repeated names (`Vary`, `Origin`, ...) are
/// shared rather than copied. Lookups are case-insensitive.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Join every value of `name` with `", "`, or `None` if the header is absent
pub(crate) fn header_line(headers: &HeaderVec, name: &str) -> Option<String> {
    let mut values = headers
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
        .peekable();
    values.peek()?;
    Some(values.collect::<Vec<_>>().join(", "))
}
