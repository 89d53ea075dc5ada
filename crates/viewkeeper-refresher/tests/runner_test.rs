//! Integration tests for RefreshRunner.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use viewkeeper_config::Configuration;
use viewkeeper_query_engine::InMemoryQueryEngine;
use viewkeeper_refresher::{
  RefreshRunner, STATUS_FULL_SUCCESS, STATUS_PARTIAL_SUCCESS, ViewRefresher,
};

fn config() -> Configuration {
  Configuration {
    workgroup: "analytics".to_string(),
    database: "warehouse".to_string(),
    output_location: "s3://query-results/views/".to_string(),
    views: [("daily_sales".to_string(), "q-1".to_string())]
      .into_iter()
      .collect(),
  }
}

fn runner(engine: Arc<InMemoryQueryEngine>, interval: Duration) -> RefreshRunner {
  RefreshRunner::new(ViewRefresher::new(engine), config(), interval)
}

#[tokio::test(start_paused = true)]
async fn test_run_once() {
  let engine = Arc::new(InMemoryQueryEngine::new().with_named_query("q-1", "SELECT 1"));
  let runner = runner(engine, Duration::from_secs(60));

  let result = runner.run_once().await;
  assert_eq!(result.status_code, STATUS_FULL_SUCCESS);
  assert_eq!(result.report.total, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start_runs_nothing() {
  let engine = Arc::new(InMemoryQueryEngine::new());
  let runner = runner(engine.clone(), Duration::from_secs(60));

  let cancel = CancellationToken::new();
  cancel.cancel();

  let invocations = runner.start(cancel, |_| {}).await;
  assert_eq!(invocations, 0);
  assert!(engine.lookups().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_repeats_until_cancelled() {
  let engine = Arc::new(InMemoryQueryEngine::new());
  let runner = runner(engine.clone(), Duration::from_secs(3600));

  let cancel = CancellationToken::new();
  let stopper = cancel.clone();
  tokio::spawn(async move {
    // Lands between the third invocation and the fourth
    tokio::time::sleep(Duration::from_secs(2 * 3600 + 1800)).await;
    stopper.cancel();
  });

  let mut codes = Vec::new();
  let invocations = runner
    .start(cancel, |result| codes.push(result.status_code))
    .await;

  assert_eq!(invocations, 3);
  assert_eq!(codes, vec![STATUS_PARTIAL_SUCCESS; 3]);
  assert_eq!(engine.lookups().await, vec!["q-1", "q-1", "q-1"]);
}
