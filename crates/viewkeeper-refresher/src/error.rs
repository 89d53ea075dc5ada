//! Per-view refresh errors.

use viewkeeper_query_engine::EngineError;

/// Errors that stop one view's refresh.
///
/// These never escape [`ViewRefresher::refresh`](crate::ViewRefresher::refresh);
/// each is recorded as a failure outcome for its view.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
  /// The named query could not be resolved.
  #[error("failed to resolve named query '{query_id}': {source}")]
  Lookup {
    query_id: String,
    #[source]
    source: EngineError,
  },

  /// The engine did not accept the query.
  #[error("failed to start query execution: {source}")]
  Submit {
    #[source]
    source: EngineError,
  },

  /// A status check of a running execution failed.
  #[error("failed to fetch status of execution '{execution_id}': {source}")]
  Status {
    execution_id: String,
    #[source]
    source: EngineError,
  },
}

impl ViewError {
  /// The execution id, if the engine had accepted the query.
  pub fn execution_id(&self) -> Option<&str> {
    match self {
      Self::Status { execution_id, .. } => Some(execution_id),
      Self::Lookup { .. } | Self::Submit { .. } => None,
    }
  }
}
