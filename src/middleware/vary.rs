use crate::message::CorsResponse;

const VARY: &str = "Vary";
const ORIGIN: &str = "Origin";

/// Ensure `Origin` appears in the response's `Vary` header
///
/// Sets `Vary: Origin` when absent. An existing value is kept as-is when one of
/// its comma-separated tokens is already `Origin` (case-insensitive); otherwise
/// `, Origin` is appended.
#[must_use]
pub fn vary(mut response: CorsResponse) -> CorsResponse {
    let Some(existing) = response
        .header_line(VARY)
        .filter(|value| !value.trim().is_empty())
    else {
        response.set_header(VARY, ORIGIN.to_string());
        return response;
    };

    let present = existing
        .split(',')
        .any(|token| token.trim().eq_ignore_ascii_case(ORIGIN));
    if !present {
        response.set_header(VARY, format!("{existing}, {ORIGIN}"));
    }
    response
}
