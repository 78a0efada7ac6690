//! # CLI Module
//!
//! Command-line front end for the `brrtcors` binary.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Build the middleware from a configuration file, run one simulated request
//! through it, and print the decision, resolved policy, and response as JSON:
//!
//! ```bash
//! brrtcors check --config cors.yaml \
//!     --method OPTIONS --uri https://api.example.com/pets \
//!     --origin https://app.example.com --request-method POST
//! ```
//!
//! ### `routes`
//!
//! Print the route table declared in the configuration file:
//!
//! ```bash
//! brrtcors routes --config cors.yaml
//! ```
//!
//! Both commands read `BRRTCORS_CONFIG` when `--config` is omitted.

mod commands;


pub use commands::{check, run_cli, CheckReport, CheckRequest, Cli, Commands};
