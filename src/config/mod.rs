//! # Static Configuration
//!
//! Loads the project CORS policy and an optional declarative route table from a
//! YAML, TOML, or JSON file.
//!
//! ```yaml
//! cors:
//!   allowed_origins: ["https://*.example.com"]
//!   allowed_headers: [Content-Type]
//!   allowed_max_age: 600
//!
//! routes:
//!   - name: list_pets
//!     path: /pets
//!     methods: [GET]
//!     cors:
//!       allowed_origins: ["*"]
//!       overrides_project_configuration: false
//!   - name: cors_demo
//!     path: /cors/demo          # no `methods`: any method
//! ```
//!
//! Other top-level keys are ignored so the CORS section can live in a larger
//! application config. Route policies are validated while loading, so a typo in a
//! route's `cors` block fails at startup rather than on the first matching request.


use anyhow::{bail, Context, Result};
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::configuration::{
    ProjectConfiguration, RouteConfiguration, CONFIGURATION_IDENTIFIER, PARAMETER_IDENTIFIER,
};
use crate::router::{AllowedMethods, RouteMeta, Router};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "BRRTCORS_CONFIG";

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Guess the format from the file extension; YAML when unknown
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteEntry {
    name: String,
    path: String,
    #[serde(default)]
    methods: Option<Vec<String>>,
    #[serde(default)]
    cors: Option<Value>,
}

/// Everything read from a configuration file
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    /// Project-wide policy (empty when the file has no `cors` section)
    pub project: ProjectConfiguration,
    /// Declared routes in file order
    pub routes: Vec<RouteMeta>,
}

impl StaticConfig {
    /// Parse configuration text
    ///
    /// # Errors
    ///
    /// Fails on syntax errors, an invalid project or route policy, an unknown
    /// route key, or an invalid method token.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).context("Invalid YAML")?,
            ConfigFormat::Toml => toml::from_str(content).context("Invalid TOML")?,
            ConfigFormat::Json => serde_json::from_str(content).context("Invalid JSON")?,
        };
        Self::from_value(&value)
    }

    /// Build from an already parsed document
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse), minus syntax errors.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => bail!("Configuration root must be a map"),
        };

        let project = match root.get(CONFIGURATION_IDENTIFIER) {
            Some(section) => ProjectConfiguration::from_value(section)
                .context("Invalid project CORS configuration")?,
            None => ProjectConfiguration::default(),
        };

        let entries: Vec<RouteEntry> = match root.get("routes") {
            Some(Value::Null) | None => Vec::new(),
            Some(routes) => {
                serde_json::from_value(routes.clone()).context("Invalid route table")?
            }
        };

        let routes = entries
            .into_iter()
            .map(route_meta)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { project, routes })
    }

    /// Compile the declared routes
    ///
    /// # Errors
    ///
    /// Fails if a path pattern does not compile.
    pub fn router(&self) -> Result<Router> {
        Router::new(self.routes.clone()).context("Failed to compile route table")
    }
}

fn route_meta(entry: RouteEntry) -> Result<RouteMeta> {
    let methods = match entry.methods {
        None => AllowedMethods::Any,
        Some(list) if list.iter().any(|m| m.trim() == "*") => AllowedMethods::Any,
        Some(list) => AllowedMethods::List(
            list.iter()
                .map(|m| {
                    Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes()).with_context(
                        || format!("Route '{}': invalid method '{}'", entry.name, m),
                    )
                })
                .collect::<Result<Vec<_>>>()?,
        ),
    };

    let mut meta = RouteMeta::new(&entry.name, &entry.path, methods);
    if let Some(cors) = entry.cors {
        if !cors.is_object() {
            bail!("Route '{}': 'cors' must be a map", entry.name);
        }
        RouteConfiguration::from_value(&cors)
            .with_context(|| format!("Route '{}': invalid CORS configuration", entry.name))?;
        meta = meta.with_default(PARAMETER_IDENTIFIER, cors);
    }
    Ok(meta)
}

/// Read and parse a configuration file, choosing the format from its extension
///
/// # Errors
///
/// Fails if the file cannot be read or does not parse.
pub fn load_config(path: &Path) -> Result<StaticConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = StaticConfig::parse(&content, ConfigFormat::from_path(path))
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    info!(
        path = %path.display(),
        routes = config.routes.len(),
        "Loaded CORS configuration"
    );
    Ok(config)
}
