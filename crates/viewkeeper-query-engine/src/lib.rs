//! Viewkeeper Query Engine
//!
//! This crate defines the contract viewkeeper consumes from the remote
//! analytical query service, and the implementations of it.
//!
//! The [`QueryEngine`] trait defines operations for:
//! - Resolving a named query id to its query text
//! - Starting an asynchronous query execution
//! - Fetching the current status of an execution
//!
//! Implementations:
//! - [`AthenaQueryEngine`] talks to Amazon Athena (feature `athena`, on by default)
//! - [`InMemoryQueryEngine`] replays scripted states, for tests and local runs

#[cfg(feature = "athena")]
mod athena;
mod engine;
mod error;
mod memory;
mod types;

#[cfg(feature = "athena")]
pub use athena::AthenaQueryEngine;
pub use engine::QueryEngine;
pub use error::EngineError;
pub use memory::InMemoryQueryEngine;
pub use types::{ExecutionStatus, QueryRequest, QueryState};
