//! Refresh events and notifiers for observability.
//!
//! Events are emitted during a refresh to allow consumers to observe
//! progress, forward it to a dashboard, assert on it in tests, etc.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::outcome::TerminalStatus;

/// Events emitted during a refresh invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RefreshEvent {
  /// An invocation has started.
  RefreshStarted { run_id: String, total: usize },

  /// A view is about to be looked up and submitted.
  ViewStarted {
    run_id: String,
    view: String,
    query_id: String,
  },

  /// A view's query execution succeeded.
  ViewSucceeded {
    run_id: String,
    view: String,
    execution_id: String,
  },

  /// A view did not refresh.
  ViewFailed {
    run_id: String,
    view: String,
    execution_id: Option<String>,
    status: TerminalStatus,
    error: String,
  },

  /// Every view has been attempted.
  RefreshCompleted {
    run_id: String,
    succeeded: usize,
    failed: usize,
  },
}

/// Trait for receiving refresh events.
///
/// The refresher calls `notify` for each event; implementations decide what to
/// do with them.
pub trait RefreshNotifier: Send + Sync {
  fn notify(&self, event: RefreshEvent);
}

/// A notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl RefreshNotifier for NoopNotifier {
  fn notify(&self, _event: RefreshEvent) {}
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  // One event per view start/finish, so an unbounded queue stays small.
  sender: mpsc::UnboundedSender<RefreshEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<RefreshEvent>) -> Self {
    Self { sender }
  }
}

impl RefreshNotifier for ChannelNotifier {
  fn notify(&self, event: RefreshEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
