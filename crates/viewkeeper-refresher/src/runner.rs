//! Recurring refresh invocations.
//!
//! The `RefreshRunner` owns a refresher and its configuration, and re-invokes
//! the refresh on a fixed interval until cancelled.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;
use viewkeeper_config::Configuration;

use crate::refresher::ViewRefresher;
use crate::report::InvocationResult;

/// Runs a [`ViewRefresher`] on a schedule.
///
/// # Usage
///
/// ```ignore
/// let runner = RefreshRunner::new(refresher, config, Duration::from_secs(86_400));
///
/// let cancel = CancellationToken::new();
/// runner.start(cancel, |result| println!("{}", result.status_code)).await;
/// ```
pub struct RefreshRunner {
  refresher: ViewRefresher,
  config: Configuration,
  interval: Duration,
}

impl RefreshRunner {
  pub fn new(refresher: ViewRefresher, config: Configuration, interval: Duration) -> Self {
    Self {
      refresher,
      config,
      interval,
    }
  }

  /// Perform a single invocation.
  pub async fn run_once(&self) -> InvocationResult {
    self.refresher.invoke(&self.config).await
  }

  /// Start the invocation loop.
  ///
  /// Runs an invocation immediately, then one every `interval`, passing each
  /// result to `on_result`. Cancellation is observed between invocations
  /// only: a started invocation always runs to completion. Returns the number
  /// of invocations performed.
  pub async fn start<F>(self, cancel: CancellationToken, mut on_result: F) -> usize
  where
    F: FnMut(&InvocationResult),
  {
    info!(
      interval_secs = self.interval.as_secs(),
      views = self.config.view_count(),
      "starting refresh runner"
    );

    let mut invocations = 0;

    loop {
      if cancel.is_cancelled() {
        break;
      }

      let result = self.run_once().await;
      invocations += 1;
      info!(
        invocation = invocations,
        status_code = result.status_code,
        "refresh invocation completed"
      );
      on_result(&result);

      tokio::select! {
          _ = cancel.cancelled() => break,
          _ = tokio::time::sleep(self.interval) => {}
      }
    }

    info!(invocations, "refresh runner stopped");
    invocations
  }
}
