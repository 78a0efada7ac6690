use std::fmt;

/// CORS configuration error
///
/// Returned when project or route parameters cannot be turned into a policy.
/// These are fatal at startup (project policy) or at first use (route policy):
/// a service must not keep serving with an invalid policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfigError {
    /// The parameter map could not be deserialized
    ///
    /// Covers unknown keys (the message names the offending key), non-string list
    /// entries, and values of the wrong shape.
    InvalidParameters {
        /// Deserializer message
        message: String,
    },
    /// `allowed_max_age` is set but not numeric
    InvalidMaxAge {
        /// The rejected value
        value: String,
    },
    /// A list entry is empty or whitespace only
    EmptyEntry {
        /// Name of the list parameter holding the entry
        field: &'static str,
    },
    /// An `allowed_methods` entry is not a valid HTTP method token
    InvalidMethod {
        /// The rejected method
        method: String,
    },
}

impl fmt::Display for CorsConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsConfigError::InvalidParameters { message } => {
                write!(f, "CORS configuration error: {}", message)
            }
            CorsConfigError::InvalidMaxAge { value } => {
                write!(
                    f,
                    "CORS configuration error: allowed_max_age '{}' is not numeric. \
                    Use a number of seconds or \"-1\" to disable preflight caching.",
                    value
                )
            }
            CorsConfigError::EmptyEntry { field } => {
                write!(
                    f,
                    "CORS configuration error: {} contains an empty entry",
                    field
                )
            }
            CorsConfigError::InvalidMethod { method } => {
                write!(
                    f,
                    "CORS configuration error: '{}' is not a valid HTTP method",
                    method
                )
            }
        }
    }
}

impl std::error::Error for CorsConfigError {}
