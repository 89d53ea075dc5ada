//! Amazon Athena query engine.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::Client;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::operation::get_named_query::GetNamedQueryError;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use tracing::{debug, instrument};

use crate::engine::QueryEngine;
use crate::error::EngineError;
use crate::types::{ExecutionStatus, QueryRequest, QueryState};

/// [`QueryEngine`] backed by the Athena API.
#[derive(Clone)]
pub struct AthenaQueryEngine {
  client: Client,
}

impl AthenaQueryEngine {
  /// Wrap an existing client.
  pub fn new(client: Client) -> Self {
    Self { client }
  }

  /// Build a client from the ambient AWS configuration (env, profile, role).
  #[instrument(level = "debug")]
  pub async fn from_env() -> Self {
    let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
    Self::new(Client::new(&shared))
  }
}

/// Map an Athena state onto the engine contract.
///
/// States added to the API after this was written are treated as still
/// running, so polling continues until the wait budget runs out.
fn map_state(state: &QueryExecutionState) -> QueryState {
  match state {
    QueryExecutionState::Queued => QueryState::Queued,
    QueryExecutionState::Running => QueryState::Running,
    QueryExecutionState::Succeeded => QueryState::Succeeded,
    QueryExecutionState::Failed => QueryState::Failed,
    QueryExecutionState::Cancelled => QueryState::Cancelled,
    _ => QueryState::Running,
  }
}

#[async_trait]
impl QueryEngine for AthenaQueryEngine {
  #[instrument(level = "debug", skip(self))]
  async fn get_named_query(&self, named_query_id: &str) -> Result<String, EngineError> {
    let output = self
      .client
      .get_named_query()
      .named_query_id(named_query_id)
      .send()
      .await
      .map_err(|e| match e.as_service_error() {
        Some(GetNamedQueryError::InvalidRequestException(_)) => EngineError::NotFound {
          id: named_query_id.to_string(),
        },
        _ => EngineError::transient(DisplayErrorContext(&e)),
      })?;

    let named_query = output
      .named_query()
      .ok_or_else(|| EngineError::malformed("GetNamedQuery returned no named query"))?;

    Ok(named_query.query_string().to_string())
  }

  #[instrument(
    level = "debug",
    skip(self, request),
    fields(database = %request.database, workgroup = %request.workgroup)
  )]
  async fn start_query_execution(&self, request: &QueryRequest) -> Result<String, EngineError> {
    let context = QueryExecutionContext::builder()
      .database(&request.database)
      .build();
    let result_config = ResultConfiguration::builder()
      .output_location(&request.output_location)
      .build();

    let output = self
      .client
      .start_query_execution()
      .query_string(&request.query)
      .query_execution_context(context)
      .result_configuration(result_config)
      .work_group(&request.workgroup)
      .send()
      .await
      .map_err(|e| EngineError::transient(DisplayErrorContext(&e)))?;

    let execution_id = output
      .query_execution_id()
      .ok_or_else(|| EngineError::malformed("StartQueryExecution returned no execution id"))?;

    debug!(execution_id, "query execution started");
    Ok(execution_id.to_string())
  }

  #[instrument(level = "debug", skip(self))]
  async fn get_query_execution(&self, execution_id: &str) -> Result<ExecutionStatus, EngineError> {
    let output = self
      .client
      .get_query_execution()
      .query_execution_id(execution_id)
      .send()
      .await
      .map_err(|e| EngineError::transient(DisplayErrorContext(&e)))?;

    let status = output
      .query_execution()
      .and_then(|q| q.status())
      .ok_or_else(|| EngineError::malformed("GetQueryExecution returned no status"))?;

    let state = status
      .state()
      .map(map_state)
      .ok_or_else(|| EngineError::malformed("GetQueryExecution returned no state"))?;

    Ok(ExecutionStatus {
      state,
      reason: status.state_change_reason().map(str::to_string),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_map_known_states() {
    assert_eq!(map_state(&QueryExecutionState::Queued), QueryState::Queued);
    assert_eq!(map_state(&QueryExecutionState::Running), QueryState::Running);
    assert_eq!(
      map_state(&QueryExecutionState::Succeeded),
      QueryState::Succeeded
    );
    assert_eq!(map_state(&QueryExecutionState::Failed), QueryState::Failed);
    assert_eq!(
      map_state(&QueryExecutionState::Cancelled),
      QueryState::Cancelled
    );
  }

  #[test]
  fn test_map_unknown_state_is_not_terminal() {
    let state = QueryExecutionState::from("SOMETHING_NEW");
    assert!(!map_state(&state).is_terminal());
  }
}
