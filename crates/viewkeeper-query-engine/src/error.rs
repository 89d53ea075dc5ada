//! Query engine errors.

/// Errors returned by a [`QueryEngine`](crate::QueryEngine).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
  /// The named query id is not registered.
  #[error("named query '{id}' not found")]
  NotFound { id: String },

  /// The request failed and may succeed if attempted again.
  #[error("query engine request failed: {message}")]
  Transient { message: String },

  /// The engine answered without a field the contract requires.
  #[error("malformed query engine response: {message}")]
  MalformedResponse { message: String },
}

impl EngineError {
  pub(crate) fn transient(message: impl std::fmt::Display) -> Self {
    Self::Transient {
      message: message.to_string(),
    }
  }

  pub(crate) fn malformed(message: impl Into<String>) -> Self {
    Self::MalformedResponse {
      message: message.into(),
    }
  }
}
