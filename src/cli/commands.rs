use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{load_config, StaticConfig, CONFIG_ENV};
use crate::configuration::Configuration;
use crate::message::{CorsRequest, CorsResponse};
use crate::middleware::{CorsMiddleware, CorsOutcome};

/// Command-line interface for brrtcors
///
/// Exercises the CORS pipeline against a static configuration without running
/// a server.
#[derive(Parser)]
#[command(name = "brrtcors")]
#[command(about = "Route-aware CORS policy resolution", long_about = None)]
pub struct Cli {
    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Simulate one request through the CORS middleware and print the result
    Check {
        /// Configuration file (YAML, TOML, or JSON)
        #[arg(short, long, env = CONFIG_ENV)]
        config: PathBuf,

        /// Request method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Absolute request URI, e.g. https://api.example.com/pets
        #[arg(short, long)]
        uri: String,

        /// Value of the Origin header
        #[arg(short, long)]
        origin: Option<String>,

        /// Value of Access-Control-Request-Method (makes an OPTIONS request a preflight)
        #[arg(long)]
        request_method: Option<String>,

        /// Extra request headers as `Name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
    /// Print the route table declared in a configuration file
    Routes {
        /// Configuration file (YAML, TOML, or JSON)
        #[arg(short, long, env = CONFIG_ENV)]
        config: PathBuf,
    },
}

/// Result of `check`, printed as JSON
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Decision name: not_cors, no_route, unauthorized, preflight, authorized, invalid_origin
    pub outcome: String,
    /// Resolved policy, when one applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<Value>,
    pub status: u16,
    pub headers: Map<String, Value>,
    pub body: Value,
}

/// Options of a simulated request
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub method: String,
    pub uri: String,
    pub origin: Option<String>,
    pub request_method: Option<String>,
    pub headers: Vec<String>,
}

/// Run `request` through a middleware built from `config`
///
/// The downstream handler answers `200 {"handled": true}`.
///
/// # Errors
///
/// Fails on a malformed method, URI, or header argument, an invalid route
/// table, or a pipeline error other than an invalid origin.
pub fn check(config: &StaticConfig, request: &CheckRequest) -> Result<CheckReport> {
    let router = config.router()?;
    let middleware = CorsMiddleware::with_router(config.project.clone(), Arc::new(router));

    let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid method '{}'", request.method))?;
    let mut cors_request = CorsRequest::parse(method, &request.uri)
        .with_context(|| format!("Invalid request URI '{}'", request.uri))?;
    if let Some(origin) = &request.origin {
        cors_request = cors_request.with_header("Origin", origin);
    }
    if let Some(requested) = &request.request_method {
        cors_request = cors_request.with_header("Access-Control-Request-Method", requested);
    }
    for header in &request.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| anyhow!("Header '{}' must look like 'Name: value'", header))?;
        cors_request = cors_request.with_header(name.trim(), value.trim());
    }

    let (outcome, policy) = match middleware.evaluate(&cors_request) {
        Ok(outcome) => describe(&outcome),
        Err(crate::service::CorsError::InvalidOrigin { .. }) => ("invalid_origin", None),
        Err(err) => return Err(err.into()),
    };

    let handler = |_: &CorsRequest| CorsResponse::json(200, json!({ "handled": true }));
    let response = middleware.handle(&cors_request, &handler)?;

    let headers = response
        .headers
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
        .collect();

    Ok(CheckReport {
        outcome: outcome.to_string(),
        policy,
        status: response.status,
        headers,
        body: response.body,
    })
}

fn describe(outcome: &CorsOutcome) -> (&'static str, Option<Value>) {
    match outcome {
        CorsOutcome::NotCors => ("not_cors", None),
        CorsOutcome::NoRoute => ("no_route", None),
        CorsOutcome::Unauthorized { .. } => ("unauthorized", None),
        CorsOutcome::Preflight { configuration, .. } => {
            ("preflight", Some(policy_json(configuration)))
        }
        CorsOutcome::Authorized { configuration, .. } => {
            ("authorized", Some(policy_json(configuration)))
        }
    }
}

fn policy_json(configuration: &dyn Configuration) -> Value {
    json!({
        "allowed_origins": configuration.allowed_origins(),
        "allowed_methods": configuration
            .allowed_methods()
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>(),
        "allowed_headers": configuration.allowed_headers(),
        "allowed_max_age": configuration.allowed_max_age(),
        "credentials_allowed": configuration.credentials_allowed(),
        "exposed_headers": configuration.exposed_headers(),
    })
}

/// Execute the parsed command line
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the simulated
/// request is malformed.
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            config,
            method,
            uri,
            origin,
            request_method,
            headers,
        } => {
            let config = load_config(&config)?;
            let report = check(
                &config,
                &CheckRequest {
                    method,
                    uri,
                    origin,
                    request_method,
                    headers,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Routes { config } => {
            load_config(&config)?.router()?.dump_routes();
        }
    }
    Ok(())
}
