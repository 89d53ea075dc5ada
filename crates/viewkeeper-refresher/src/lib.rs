//! Viewkeeper Refresher
//!
//! This crate re-runs the named queries that define derived views, waits for
//! each execution to finish, and aggregates the outcomes into a report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RefreshRunner                          │
//! │  - run_once() → InvocationResult                            │
//! │  - start(cancel, on_result) repeats every interval          │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ViewRefresher                          │
//! │  - refresh(config) → RefreshReport                          │
//! │  - one view at a time: lookup, submit, poll                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   dyn QueryEngine                           │
//! │  - Athena in production, in-memory in tests                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use viewkeeper_config::Configuration;
//! use viewkeeper_query_engine::AthenaQueryEngine;
//! use viewkeeper_refresher::ViewRefresher;
//!
//! let config = Configuration::from_env()?;
//! let engine = Arc::new(AthenaQueryEngine::from_env().await);
//! let refresher = ViewRefresher::new(engine);
//!
//! let result = refresher.invoke(&config).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```
//!
//! A view's failure never aborts the batch: every view ends up in exactly one
//! of the report's success or failure lists.

mod error;
mod events;
mod outcome;
mod policy;
mod refresher;
mod report;
mod runner;

pub use error::ViewError;
pub use events::{ChannelNotifier, NoopNotifier, RefreshEvent, RefreshNotifier};
pub use outcome::{QueryOutcome, TerminalStatus, UNKNOWN_ERROR};
pub use policy::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, PollPolicy};
pub use refresher::ViewRefresher;
pub use report::{InvocationResult, RefreshReport, STATUS_FULL_SUCCESS, STATUS_PARTIAL_SUCCESS};
pub use runner::RefreshRunner;
