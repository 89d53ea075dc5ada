use std::fmt;

use serde::{Deserialize, Serialize};

/// State of an asynchronous query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryState {
  Queued,
  Running,
  Succeeded,
  Failed,
  Cancelled,
}

impl QueryState {
  /// Whether the execution has finished and will not change further.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
  }

  /// The engine's wire name for this state.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Queued => "QUEUED",
      Self::Running => "RUNNING",
      Self::Succeeded => "SUCCEEDED",
      Self::Failed => "FAILED",
      Self::Cancelled => "CANCELLED",
    }
  }
}

impl fmt::Display for QueryState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Status of an execution as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
  pub state: QueryState,
  /// Engine-provided explanation of the last state change, if any.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

impl ExecutionStatus {
  pub fn new(state: QueryState) -> Self {
    Self {
      state,
      reason: None,
    }
  }

  pub fn with_reason(state: QueryState, reason: impl Into<String>) -> Self {
    Self {
      state,
      reason: Some(reason.into()),
    }
  }
}

/// A query submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
  /// Query text to execute.
  pub query: String,
  /// Database the query runs against.
  pub database: String,
  /// Where the engine writes results.
  pub output_location: String,
  /// Workgroup the execution is metered against.
  pub workgroup: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_terminal_states() {
    assert!(!QueryState::Queued.is_terminal());
    assert!(!QueryState::Running.is_terminal());
    assert!(QueryState::Succeeded.is_terminal());
    assert!(QueryState::Failed.is_terminal());
    assert!(QueryState::Cancelled.is_terminal());
  }

  #[test]
  fn test_state_wire_names() {
    assert_eq!(
      serde_json::to_string(&QueryState::Succeeded).unwrap(),
      "\"SUCCEEDED\""
    );
    assert_eq!(QueryState::Cancelled.to_string(), "CANCELLED");
  }
}
