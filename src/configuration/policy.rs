use http::Method;

use super::{Configuration, CorsConfigError, OriginPattern, ANY_ORIGIN, PREFLIGHT_CACHE_DISABLED};

/// Field storage shared by both configuration variants
///
/// Every constructor and merge goes through the normalizers below, so the list
/// invariants (unique, non-empty entries; `*` collapsing; sorted methods) hold for
/// any value reachable from the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Policy {
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) origin_patterns: Vec<OriginPattern>,
    pub(crate) allowed_methods: Vec<Method>,
    pub(crate) allowed_headers: Vec<String>,
    pub(crate) allowed_max_age: String,
    pub(crate) credentials_allowed: bool,
    pub(crate) exposed_headers: Vec<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            origin_patterns: Vec::new(),
            allowed_methods: Vec::new(),
            allowed_headers: Vec::new(),
            allowed_max_age: PREFLIGHT_CACHE_DISABLED.to_string(),
            credentials_allowed: false,
            exposed_headers: Vec::new(),
        }
    }
}

impl Policy {
    pub(crate) fn build(
        allowed_origins: Vec<String>,
        allowed_methods: Vec<Method>,
        allowed_headers: Vec<String>,
        allowed_max_age: Option<String>,
        credentials_allowed: bool,
        exposed_headers: Vec<String>,
    ) -> Result<Self, CorsConfigError> {
        reject_empty("allowed_origins", &allowed_origins)?;
        reject_empty("allowed_headers", &allowed_headers)?;
        reject_empty("exposed_headers", &exposed_headers)?;

        let origin_patterns =
            normalize_origins(allowed_origins.into_iter().map(OriginPattern::new).collect());

        Ok(Self {
            allowed_origins: origin_strings(&origin_patterns),
            origin_patterns,
            allowed_methods: normalize_methods(allowed_methods),
            allowed_headers: unique(allowed_headers),
            allowed_max_age: validate_max_age(allowed_max_age)?,
            credentials_allowed,
            exposed_headers: unique(exposed_headers),
        })
    }

    /// Merge `other` (lower precedence) into a copy of `self`
    pub(crate) fn merged_with(&self, other: &dyn Configuration) -> Self {
        let mut merged = self.clone();

        // true in either wins; never downgraded
        if !merged.credentials_allowed {
            merged.credentials_allowed = other.credentials_allowed();
        }

        // first writer wins
        if merged.allowed_max_age == PREFLIGHT_CACHE_DISABLED {
            merged.allowed_max_age = other.allowed_max_age().to_string();
        }

        merged.allowed_headers = unique(concat(other.allowed_headers(), &self.allowed_headers));
        // patterns were compiled when each side was built
        merged.origin_patterns = normalize_origins(
            other
                .origin_patterns()
                .iter()
                .chain(self.origin_patterns.iter())
                .cloned()
                .collect(),
        );
        merged.allowed_origins = origin_strings(&merged.origin_patterns);
        merged.exposed_headers = unique(concat(other.exposed_headers(), &self.exposed_headers));
        merged.allowed_methods = normalize_methods(
            other
                .allowed_methods()
                .iter()
                .chain(self.allowed_methods.iter())
                .cloned(),
        );

        merged
    }

    pub(crate) fn with_methods(&self, methods: &[Method]) -> Self {
        let mut updated = self.clone();
        updated.allowed_methods = normalize_methods(
            self.allowed_methods
                .iter()
                .chain(methods.iter())
                .cloned(),
        );
        updated
    }
}

fn concat(first: &[String], second: &[String]) -> Vec<String> {
    first.iter().chain(second.iter()).cloned().collect()
}

/// Deduplicate, keeping the first occurrence of each entry
pub(crate) fn unique(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Deduplicate origins and collapse to `["*"]` when the wildcard is present
fn normalize_origins(values: Vec<OriginPattern>) -> Vec<OriginPattern> {
    if values.iter().any(|o| o.as_str() == ANY_ORIGIN) {
        return vec![OriginPattern::new(ANY_ORIGIN)];
    }
    let mut out: Vec<OriginPattern> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn origin_strings(patterns: &[OriginPattern]) -> Vec<String> {
    patterns.iter().map(|p| p.as_str().to_string()).collect()
}

/// Deduplicate methods and sort them ascending by token
pub(crate) fn normalize_methods(values: impl IntoIterator<Item = Method>) -> Vec<Method> {
    let mut methods: Vec<Method> = Vec::new();
    for method in values {
        if !methods.contains(&method) {
            methods.push(method);
        }
    }
    methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    methods
}

/// Parse configured method tokens, uppercasing them first
pub(crate) fn parse_methods(values: &[String]) -> Result<Vec<Method>, CorsConfigError> {
    values
        .iter()
        .map(|raw| {
            let token = raw.trim().to_ascii_uppercase();
            if token.is_empty() {
                return Err(CorsConfigError::EmptyEntry {
                    field: "allowed_methods",
                });
            }
            Method::from_bytes(token.as_bytes()).map_err(|_| CorsConfigError::InvalidMethod {
                method: raw.clone(),
            })
        })
        .collect()
}

fn reject_empty(field: &'static str, values: &[String]) -> Result<(), CorsConfigError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(CorsConfigError::EmptyEntry { field });
    }
    Ok(())
}

fn validate_max_age(value: Option<String>) -> Result<String, CorsConfigError> {
    let Some(value) = value else {
        return Ok(PREFLIGHT_CACHE_DISABLED.to_string());
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(PREFLIGHT_CACHE_DISABLED.to_string());
    }

    let numeric = trimmed
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
        // digit runs too long for f64 still count as numbers
        || is_integer_literal(trimmed);

    if numeric {
        Ok(trimmed.to_string())
    } else {
        Err(CorsConfigError::InvalidMaxAge { value })
    }
}

fn is_integer_literal(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
