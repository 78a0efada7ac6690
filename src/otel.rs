//! Structured logging initialization
//!
//! All crate modules log through `tracing` macros with structured fields; this
//! module wires a `tracing-subscriber` registry for binaries.
//!
//! ## Environment Variables
//!
//! - `BRRTCORS_LOG_LEVEL` - trace/debug/info/warn/error (default `info`)
//! - `BRRTCORS_LOG_FORMAT` - `json` or `pretty` (default `json`)
//! - `BRRTCORS_LOG_ASYNC` - buffer output through a background writer (default `false`)
//! - `BRRTCORS_LOG_FILTER` - extra comma-separated directives, e.g. `brrtcors::service=debug`
//!
//! `RUST_LOG`, when set, replaces the level-derived base filter.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json, // Default to JSON
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    /// Log format: json/pretty
    pub format: LogFormat,
    /// Write through a non-blocking background worker
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup("BRRTCORS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: LogFormat::parse(
                &lookup("BRRTCORS_LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
            ),
            async_logging: lookup("BRRTCORS_LOG_ASYNC")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            target_filter: lookup("BRRTCORS_LOG_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: false,
        }
    }

    /// The tracing level named by `log_level` (INFO when unrecognized)
    #[must_use]
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Build the subscriber filter: `RUST_LOG` or the level, plus `target_filter`
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {}", filter),
                }
            }
        }

        env_filter
    }
}

/// Keeps the background log writer alive; drop it to flush on shutdown
#[must_use = "dropping the guard stops buffered logging"]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Initialize logging from the environment, overriding the level
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(log_level: &str) -> Result<LoggingGuard> {
    let mut config = LogConfig::from_env();
    config.log_level = log_level.to_string();
    init_logging_with_config(&config)
}

/// Install the global subscriber described by `config`
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<LoggingGuard> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let (writer, worker) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    registry
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(LoggingGuard { _worker: worker })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Json); // Default
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.async_logging);
        assert!(config.target_filter.is_none());
    }

    #[test]
    fn test_from_lookup_reads_prefixed_variables() {
        let config = LogConfig::from_lookup(lookup(&[
            ("BRRTCORS_LOG_LEVEL", "debug"),
            ("BRRTCORS_LOG_FORMAT", "pretty"),
            ("BRRTCORS_LOG_ASYNC", "true"),
            ("BRRTCORS_LOG_FILTER", "brrtcors::service=trace"),
        ]));
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.async_logging);
        assert_eq!(
            config.target_filter.as_deref(),
            Some("brrtcors::service=trace")
        );
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = LogConfig::from_lookup(lookup(&[
            ("BRRTCORS_LOG_LEVEL", "loud"),
            ("BRRTCORS_LOG_ASYNC", "maybe"),
            ("BRRTCORS_LOG_FILTER", "  "),
        ]));
        assert_eq!(config.level(), Level::INFO);
        assert!(!config.async_logging);
        assert!(config.target_filter.is_none());
    }
}
