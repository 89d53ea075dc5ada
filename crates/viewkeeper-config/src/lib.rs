//! Viewkeeper Config
//!
//! This crate contains the configuration read once at the start of a refresh
//! invocation: where queries run (workgroup, database, output location) and
//! which views to refresh (view name → named query id).
//!
//! Configuration can be loaded from:
//! - Environment variables (the deployment default)
//! - A JSON file (via CLI with `--config=viewkeeper.json`)
//!
//! A missing or malformed setting is the only fatal error class in viewkeeper:
//! it aborts the invocation before any view is attempted.

mod config;
mod error;

pub use config::{
  Configuration, ENV_DATABASE, ENV_NAMED_QUERY_IDS, ENV_OUTPUT_LOCATION, ENV_WORKGROUP, ViewMap,
};
pub use error::ConfigError;
