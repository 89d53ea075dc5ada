//! Status polling bounds.

use std::time::Duration;

/// Time between two status checks of one execution.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Total time spent waiting on one execution before giving up.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60);

/// Shortest interval the poller sleeps between two status checks.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How an execution is polled until it reaches a terminal state.
///
/// The status is checked, then the poller sleeps `interval` and adds it to the
/// elapsed time; checking stops once elapsed time reaches `max_wait`. With the
/// defaults that is at most 30 checks, at 0s, 2s, ..., 58s. Intervals shorter
/// than [`MIN_POLL_INTERVAL`] are raised to it, so the number of checks is
/// always bounded by `max_wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
  pub interval: Duration,
  pub max_wait: Duration,
}

impl PollPolicy {
  pub fn new(interval: Duration, max_wait: Duration) -> Self {
    Self {
      interval: interval.max(MIN_POLL_INTERVAL),
      max_wait,
    }
  }

  /// The interval actually slept between checks.
  pub fn effective_interval(&self) -> Duration {
    self.interval.max(MIN_POLL_INTERVAL)
  }

  /// Upper bound on the number of status checks per execution.
  pub fn max_checks(&self) -> u32 {
    let interval = self.effective_interval().as_nanos();
    let checks = self.max_wait.as_nanos().div_ceil(interval);
    u32::try_from(checks).unwrap_or(u32::MAX)
  }
}

impl Default for PollPolicy {
  fn default() -> Self {
    Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_policy() {
    let policy = PollPolicy::default();
    assert_eq!(policy.interval, Duration::from_secs(2));
    assert_eq!(policy.max_wait, Duration::from_secs(60));
    assert_eq!(policy.max_checks(), 30);
  }

  #[test]
  fn test_max_checks_rounds_up() {
    let policy = PollPolicy::new(Duration::from_secs(4), Duration::from_secs(10));
    assert_eq!(policy.max_checks(), 3);
  }

  #[test]
  fn test_zero_interval_is_raised_to_minimum() {
    let policy = PollPolicy::new(Duration::ZERO, Duration::from_secs(60));
    assert_eq!(policy.interval, MIN_POLL_INTERVAL);
    assert_eq!(policy.max_checks(), 600);

    let literal = PollPolicy {
      interval: Duration::ZERO,
      max_wait: Duration::from_secs(60),
    };
    assert_eq!(literal.effective_interval(), MIN_POLL_INTERVAL);
    assert_eq!(literal.max_checks(), 600);
  }

  #[test]
  fn test_zero_wait_means_no_checks() {
    let policy = PollPolicy::new(Duration::from_secs(2), Duration::ZERO);
    assert_eq!(policy.max_checks(), 0);
  }
}
