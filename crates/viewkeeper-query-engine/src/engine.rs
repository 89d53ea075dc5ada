use async_trait::async_trait;

use crate::error::EngineError;
use crate::types::{ExecutionStatus, QueryRequest};

/// The remote query service as seen by viewkeeper.
///
/// Every call is a single request/response; implementations do not retry.
#[async_trait]
pub trait QueryEngine: Send + Sync {
  /// Resolve a named query id to its query text.
  async fn get_named_query(&self, named_query_id: &str) -> Result<String, EngineError>;

  /// Submit a query for execution and return its execution id.
  async fn start_query_execution(&self, request: &QueryRequest) -> Result<String, EngineError>;

  /// Fetch the current status of an execution.
  async fn get_query_execution(&self, execution_id: &str) -> Result<ExecutionStatus, EngineError>;
}
