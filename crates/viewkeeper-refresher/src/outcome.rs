//! Per-view refresh outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error text used when the engine gives no reason for a failed execution.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// How a view's refresh attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalStatus {
  Succeeded,
  Failed,
  Cancelled,
  /// The execution did not reach a terminal state within the wait budget.
  TimedOut,
}

impl fmt::Display for TerminalStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Succeeded => "SUCCEEDED",
      Self::Failed => "FAILED",
      Self::Cancelled => "CANCELLED",
      Self::TimedOut => "TIMED_OUT",
    })
  }
}

/// Result of one view's refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
  /// View name from the configuration.
  pub view: String,
  /// Engine execution id; absent when lookup or submission failed.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub execution_id: Option<String>,
  pub status: TerminalStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl QueryOutcome {
  /// A view whose execution succeeded.
  pub fn succeeded(view: impl Into<String>, execution_id: impl Into<String>) -> Self {
    Self {
      view: view.into(),
      execution_id: Some(execution_id.into()),
      status: TerminalStatus::Succeeded,
      error: None,
    }
  }

  /// A view that did not refresh.
  pub fn failed(
    view: impl Into<String>,
    execution_id: Option<String>,
    status: TerminalStatus,
    error: impl Into<String>,
  ) -> Self {
    Self {
      view: view.into(),
      execution_id,
      status,
      error: Some(error.into()),
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == TerminalStatus::Succeeded
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_success_serializes_without_error() {
    let outcome = QueryOutcome::succeeded("daily_sales", "exec-1");
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
      json,
      serde_json::json!({
        "view": "daily_sales",
        "execution_id": "exec-1",
        "status": "SUCCEEDED"
      })
    );
  }

  #[test]
  fn test_lookup_failure_serializes_without_execution_id() {
    let outcome = QueryOutcome::failed("top_users", None, TerminalStatus::Failed, "not found");
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
      json,
      serde_json::json!({
        "view": "top_users",
        "status": "FAILED",
        "error": "not found"
      })
    );
    assert!(!outcome.is_success());
  }

  #[test]
  fn test_timed_out_wire_name() {
    assert_eq!(
      serde_json::to_string(&TerminalStatus::TimedOut).unwrap(),
      "\"TIMED_OUT\""
    );
    assert_eq!(TerminalStatus::TimedOut.to_string(), "TIMED_OUT");
  }
}
