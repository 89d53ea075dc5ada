//! View refresher implementation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use viewkeeper_config::Configuration;
use viewkeeper_query_engine::{EngineError, ExecutionStatus, QueryEngine, QueryRequest, QueryState};

use crate::error::ViewError;
use crate::events::{NoopNotifier, RefreshEvent, RefreshNotifier};
use crate::outcome::{QueryOutcome, TerminalStatus, UNKNOWN_ERROR};
use crate::policy::PollPolicy;
use crate::report::{InvocationResult, RefreshReport};

/// How waiting on one execution ended.
enum PollResult {
  /// The engine reported a terminal state.
  Terminal(ExecutionStatus),
  /// The wait budget ran out; holds the last status observed, if any.
  TimedOut(Option<ExecutionStatus>),
}

/// Re-runs the named queries behind each configured view.
///
/// Views are processed strictly one at a time, in configuration order. Each
/// view is attempted exactly once per call, and nothing is retried.
pub struct ViewRefresher {
  engine: Arc<dyn QueryEngine>,
  poll: PollPolicy,
  notifier: Arc<dyn RefreshNotifier>,
}

impl ViewRefresher {
  /// Create a refresher that talks to `engine`.
  pub fn new(engine: Arc<dyn QueryEngine>) -> Self {
    Self {
      engine,
      poll: PollPolicy::default(),
      notifier: Arc::new(NoopNotifier),
    }
  }

  /// Override the status polling bounds.
  pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
    self.poll = poll;
    self
  }

  /// Send refresh events to `notifier`.
  pub fn with_notifier(mut self, notifier: Arc<dyn RefreshNotifier>) -> Self {
    self.notifier = notifier;
    self
  }

  /// Refresh every view in `config` and report the outcomes.
  ///
  /// Per-view failures are recorded in the report, never returned.
  #[instrument(
    name = "refresh",
    skip(self, config),
    fields(
      workgroup = %config.workgroup,
      database = %config.database,
    )
  )]
  pub async fn refresh(&self, config: &Configuration) -> RefreshReport {
    let run_id = uuid::Uuid::new_v4().to_string();
    let total = config.view_count();

    info!(
      run_id = %run_id,
      started_at = %Utc::now().to_rfc3339(),
      workgroup = %config.workgroup,
      database = %config.database,
      views = total,
      "starting view refresh"
    );
    self.notifier.notify(RefreshEvent::RefreshStarted {
      run_id: run_id.clone(),
      total,
    });

    let mut report = RefreshReport::new(total);

    for (view, query_id) in &config.views {
      self.notifier.notify(RefreshEvent::ViewStarted {
        run_id: run_id.clone(),
        view: view.clone(),
        query_id: query_id.clone(),
      });

      let outcome = self.refresh_view(config, view, query_id).await;

      match &outcome {
        QueryOutcome {
          execution_id: Some(execution_id),
          status: TerminalStatus::Succeeded,
          ..
        } => {
          info!(view = %view, execution_id = %execution_id, "✓ view refreshed");
          self.notifier.notify(RefreshEvent::ViewSucceeded {
            run_id: run_id.clone(),
            view: view.clone(),
            execution_id: execution_id.clone(),
          });
        }
        _ => {
          let error = outcome.error.as_deref().unwrap_or(UNKNOWN_ERROR);
          warn!(
            view = %view,
            execution_id = ?outcome.execution_id,
            status = %outcome.status,
            error = %error,
            "✗ view refresh failed"
          );
          self.notifier.notify(RefreshEvent::ViewFailed {
            run_id: run_id.clone(),
            view: view.clone(),
            execution_id: outcome.execution_id.clone(),
            status: outcome.status,
            error: error.to_string(),
          });
        }
      }

      report.record(outcome);
    }

    self.log_summary(&run_id, &report);
    self.notifier.notify(RefreshEvent::RefreshCompleted {
      run_id,
      succeeded: report.successes.len(),
      failed: report.failures.len(),
    });

    report
  }

  /// Refresh every view and wrap the report as an invocation result.
  pub async fn invoke(&self, config: &Configuration) -> InvocationResult {
    let report = self.refresh(config).await;
    InvocationResult::new(report, Utc::now())
  }

  /// Refresh a single view, converting any error into a failure outcome.
  async fn refresh_view(&self, config: &Configuration, view: &str, query_id: &str) -> QueryOutcome {
    match self.try_refresh_view(config, view, query_id).await {
      Ok(outcome) => outcome,
      Err(e) => QueryOutcome::failed(
        view,
        e.execution_id().map(str::to_string),
        TerminalStatus::Failed,
        e.to_string(),
      ),
    }
  }

  async fn try_refresh_view(
    &self,
    config: &Configuration,
    view: &str,
    query_id: &str,
  ) -> Result<QueryOutcome, ViewError> {
    info!(view = %view, query_id = %query_id, "processing view");

    let query = self
      .engine
      .get_named_query(query_id)
      .await
      .map_err(|source| ViewError::Lookup {
        query_id: query_id.to_string(),
        source,
      })?;

    info!(view = %view, "executing query");

    let request = QueryRequest {
      query,
      database: config.database.clone(),
      output_location: config.output_location.clone(),
      workgroup: config.workgroup.clone(),
    };
    let execution_id = self
      .engine
      .start_query_execution(&request)
      .await
      .map_err(|source| ViewError::Submit { source })?;

    let poll_result = self
      .await_terminal(&execution_id)
      .await
      .map_err(|source| ViewError::Status {
        execution_id: execution_id.clone(),
        source,
      })?;

    Ok(self.outcome_for(view, execution_id, poll_result))
  }

  /// Poll an execution until it reaches a terminal state or the wait budget
  /// is spent.
  #[instrument(level = "debug", skip(self))]
  async fn await_terminal(&self, execution_id: &str) -> Result<PollResult, EngineError> {
    let interval = self.poll.effective_interval();
    let max_checks = self.poll.max_checks();
    let mut last = None;

    for check in 1..=max_checks {
      let status = self.engine.get_query_execution(execution_id).await?;
      if status.state.is_terminal() {
        return Ok(PollResult::Terminal(status));
      }
      debug!(state = %status.state, check, max_checks, "execution not finished");
      last = Some(status);

      tokio::time::sleep(interval).await;
    }

    debug!(max_checks, "wait budget exhausted before terminal state");
    Ok(PollResult::TimedOut(last))
  }

  fn outcome_for(&self, view: &str, execution_id: String, result: PollResult) -> QueryOutcome {
    match result {
      PollResult::Terminal(ExecutionStatus {
        state: QueryState::Succeeded,
        ..
      }) => QueryOutcome::succeeded(view, execution_id),
      PollResult::Terminal(status) => {
        let terminal = if status.state == QueryState::Cancelled {
          TerminalStatus::Cancelled
        } else {
          TerminalStatus::Failed
        };
        let error = status.reason.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        QueryOutcome::failed(view, Some(execution_id), terminal, error)
      }
      PollResult::TimedOut(last) => {
        let last_state = last
          .as_ref()
          .map_or("UNKNOWN", |s| s.state.as_str());
        let error = last.and_then(|s| s.reason).unwrap_or_else(|| {
          format!(
            "query did not reach a terminal state within {}s (last state: {})",
            self.poll.max_wait.as_secs(),
            last_state
          )
        });
        QueryOutcome::failed(view, Some(execution_id), TerminalStatus::TimedOut, error)
      }
    }
  }

  fn log_summary(&self, run_id: &str, report: &RefreshReport) {
    info!(
      run_id = %run_id,
      total = report.total,
      succeeded = report.successes.len(),
      failed = report.failures.len(),
      completed_at = %Utc::now().to_rfc3339(),
      "view refresh summary"
    );
    for failure in &report.failures {
      warn!(
        run_id = %run_id,
        view = %failure.view,
        error = %failure.error.as_deref().unwrap_or(UNKNOWN_ERROR),
        "failed view"
      );
    }
  }
}
