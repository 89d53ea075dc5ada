//! In-memory query engine.
//!
//! Named queries and per-query status sequences are registered up front.
//! Each execution of a query replays its sequence one status per
//! [`get_query_execution`](QueryEngine::get_query_execution) call, repeating
//! the last status once the sequence is exhausted. A query without a script
//! succeeds on the first status check.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::engine::QueryEngine;
use crate::error::EngineError;
use crate::types::{ExecutionStatus, QueryRequest, QueryState};

#[derive(Debug)]
struct Execution {
  query: String,
  pending: VecDeque<ExecutionStatus>,
  current: ExecutionStatus,
  polls: usize,
}

#[derive(Debug, Default)]
struct State {
  named_queries: HashMap<String, String>,
  scripts: HashMap<String, Vec<ExecutionStatus>>,
  start_errors: HashMap<String, EngineError>,
  status_errors: HashMap<String, EngineError>,
  executions: HashMap<String, Execution>,
  lookups: Vec<String>,
  submitted: Vec<QueryRequest>,
  next_execution: usize,
}

/// A scripted [`QueryEngine`] held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryQueryEngine {
  state: Mutex<State>,
}

impl InMemoryQueryEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a named query.
  pub fn with_named_query(mut self, id: impl Into<String>, query: impl Into<String>) -> Self {
    self
      .state
      .get_mut()
      .named_queries
      .insert(id.into(), query.into());
    self
  }

  /// Script the statuses reported for executions of `query`.
  pub fn with_states(
    mut self,
    query: impl Into<String>,
    states: impl IntoIterator<Item = ExecutionStatus>,
  ) -> Self {
    self
      .state
      .get_mut()
      .scripts
      .insert(query.into(), states.into_iter().collect());
    self
  }

  /// Make submission of `query` fail.
  pub fn with_start_error(mut self, query: impl Into<String>, error: EngineError) -> Self {
    self
      .state
      .get_mut()
      .start_errors
      .insert(query.into(), error);
    self
  }

  /// Make every status check of executions of `query` fail.
  pub fn with_status_error(mut self, query: impl Into<String>, error: EngineError) -> Self {
    self
      .state
      .get_mut()
      .status_errors
      .insert(query.into(), error);
    self
  }

  /// Named query ids looked up so far, in call order.
  pub async fn lookups(&self) -> Vec<String> {
    self.state.lock().await.lookups.clone()
  }

  /// Requests submitted so far, in call order.
  pub async fn submitted(&self) -> Vec<QueryRequest> {
    self.state.lock().await.submitted.clone()
  }

  /// Number of status checks made against an execution.
  pub async fn poll_count(&self, execution_id: &str) -> usize {
    self
      .state
      .lock()
      .await
      .executions
      .get(execution_id)
      .map_or(0, |e| e.polls)
  }
}

#[async_trait]
impl QueryEngine for InMemoryQueryEngine {
  async fn get_named_query(&self, named_query_id: &str) -> Result<String, EngineError> {
    let mut state = self.state.lock().await;
    state.lookups.push(named_query_id.to_string());
    state
      .named_queries
      .get(named_query_id)
      .cloned()
      .ok_or_else(|| EngineError::NotFound {
        id: named_query_id.to_string(),
      })
  }

  async fn start_query_execution(&self, request: &QueryRequest) -> Result<String, EngineError> {
    let mut state = self.state.lock().await;
    state.submitted.push(request.clone());

    if let Some(err) = state.start_errors.get(&request.query) {
      return Err(err.clone());
    }

    state.next_execution += 1;
    let execution_id = format!("exec-{}", state.next_execution);

    let pending: VecDeque<ExecutionStatus> = state
      .scripts
      .get(&request.query)
      .cloned()
      .unwrap_or_else(|| vec![ExecutionStatus::new(QueryState::Succeeded)])
      .into();

    state.executions.insert(
      execution_id.clone(),
      Execution {
        query: request.query.clone(),
        pending,
        current: ExecutionStatus::new(QueryState::Queued),
        polls: 0,
      },
    );

    Ok(execution_id)
  }

  async fn get_query_execution(&self, execution_id: &str) -> Result<ExecutionStatus, EngineError> {
    let mut state = self.state.lock().await;
    let State {
      executions,
      status_errors,
      ..
    } = &mut *state;

    let execution = executions
      .get_mut(execution_id)
      .ok_or_else(|| EngineError::malformed(format!("unknown execution '{execution_id}'")))?;
    execution.polls += 1;

    if let Some(err) = status_errors.get(&execution.query) {
      return Err(err.clone());
    }

    if let Some(next) = execution.pending.pop_front() {
      execution.current = next;
    }
    Ok(execution.current.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(query: &str) -> QueryRequest {
    QueryRequest {
      query: query.to_string(),
      database: "db".to_string(),
      output_location: "s3://out/".to_string(),
      workgroup: "wg".to_string(),
    }
  }

  #[tokio::test]
  async fn test_named_query_lookup() {
    let engine = InMemoryQueryEngine::new().with_named_query("q-1", "SELECT 1");

    assert_eq!(engine.get_named_query("q-1").await.unwrap(), "SELECT 1");
    assert_eq!(
      engine.get_named_query("q-2").await.unwrap_err(),
      EngineError::NotFound {
        id: "q-2".to_string()
      }
    );
    assert_eq!(engine.lookups().await, vec!["q-1", "q-2"]);
  }

  #[tokio::test]
  async fn test_unscripted_query_succeeds() {
    let engine = InMemoryQueryEngine::new();
    let id = engine
      .start_query_execution(&request("SELECT 1"))
      .await
      .unwrap();

    let status = engine.get_query_execution(&id).await.unwrap();
    assert_eq!(status.state, QueryState::Succeeded);
    assert_eq!(engine.poll_count(&id).await, 1);
  }

  #[tokio::test]
  async fn test_script_replays_and_repeats_last() {
    let engine = InMemoryQueryEngine::new().with_states(
      "SELECT 1",
      [
        ExecutionStatus::new(QueryState::Queued),
        ExecutionStatus::with_reason(QueryState::Failed, "boom"),
      ],
    );
    let id = engine
      .start_query_execution(&request("SELECT 1"))
      .await
      .unwrap();

    let states: Vec<QueryState> = {
      let mut out = Vec::new();
      for _ in 0..3 {
        out.push(engine.get_query_execution(&id).await.unwrap().state);
      }
      out
    };
    assert_eq!(
      states,
      vec![QueryState::Queued, QueryState::Failed, QueryState::Failed]
    );
  }

  #[tokio::test]
  async fn test_execution_ids_are_distinct() {
    let engine = InMemoryQueryEngine::new();
    let a = engine.start_query_execution(&request("A")).await.unwrap();
    let b = engine.start_query_execution(&request("B")).await.unwrap();

    assert_ne!(a, b);
    assert_eq!(engine.submitted().await.len(), 2);
  }

  #[tokio::test]
  async fn test_start_error() {
    let engine = InMemoryQueryEngine::new()
      .with_start_error("SELECT 1", EngineError::transient("throttled"));

    let err = engine
      .start_query_execution(&request("SELECT 1"))
      .await
      .unwrap_err();
    assert!(matches!(err, EngineError::Transient { .. }));
  }

  #[tokio::test]
  async fn test_unknown_execution_is_malformed() {
    let engine = InMemoryQueryEngine::new();
    let err = engine.get_query_execution("nope").await.unwrap_err();
    assert!(matches!(err, EngineError::MalformedResponse { .. }));
  }
}
