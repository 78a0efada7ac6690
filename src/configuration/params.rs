use serde::{Deserialize, Deserializer};

/// Parameters recognized by the project-level policy
///
/// Keys are accepted in snake_case or camelCase. Any other key fails
/// deserialization with a message naming it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectParameters {
    #[serde(alias = "allowedOrigins")]
    pub allowed_origins: Vec<String>,
    #[serde(alias = "allowedMethods")]
    pub allowed_methods: Vec<String>,
    #[serde(alias = "allowedHeaders")]
    pub allowed_headers: Vec<String>,
    #[serde(alias = "allowedMaxAge", deserialize_with = "deserialize_max_age")]
    pub allowed_max_age: Option<String>,
    #[serde(alias = "credentialsAllowed")]
    pub credentials_allowed: bool,
    #[serde(alias = "exposedHeaders")]
    pub exposed_headers: Vec<String>,
}

/// Parameters recognized by a route-level policy
///
/// Same contract as [`ProjectParameters`] minus `allowed_methods` (route methods
/// always come from the router) plus the two route flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteParameters {
    #[serde(alias = "allowedOrigins")]
    pub allowed_origins: Vec<String>,
    #[serde(alias = "allowedHeaders")]
    pub allowed_headers: Vec<String>,
    #[serde(alias = "allowedMaxAge", deserialize_with = "deserialize_max_age")]
    pub allowed_max_age: Option<String>,
    #[serde(alias = "credentialsAllowed")]
    pub credentials_allowed: bool,
    #[serde(alias = "exposedHeaders")]
    pub exposed_headers: Vec<String>,
    #[serde(alias = "overridesProjectConfiguration")]
    pub overrides_project_configuration: bool,
    pub explicit: bool,
}

impl Default for RouteParameters {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_headers: Vec::new(),
            allowed_max_age: None,
            credentials_allowed: false,
            exposed_headers: Vec::new(),
            overrides_project_configuration: true,
            explicit: false,
        }
    }
}

/// Max age as written in a config file: quoted or bare number
#[derive(Deserialize)]
#[serde(untagged)]
enum MaxAgeValue {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

// Kept as a string so very large client-facing values survive untouched.
fn deserialize_max_age<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<MaxAgeValue>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        MaxAgeValue::Text(s) => s,
        MaxAgeValue::Signed(n) => n.to_string(),
        MaxAgeValue::Unsigned(n) => n.to_string(),
        MaxAgeValue::Float(n) => n.to_string(),
    }))
}
