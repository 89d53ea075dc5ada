//! Invocation reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::outcome::QueryOutcome;

/// Status code of an invocation in which every view refreshed.
pub const STATUS_FULL_SUCCESS: u16 = 200;
/// Status code of an invocation with at least one failed view.
pub const STATUS_PARTIAL_SUCCESS: u16 = 206;

/// Aggregate of all outcomes of one invocation.
///
/// Serialized as `{"total": .., "success": [..], "failed": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshReport {
  /// Number of views in the configuration.
  pub total: usize,
  #[serde(rename = "success")]
  pub successes: Vec<QueryOutcome>,
  #[serde(rename = "failed")]
  pub failures: Vec<QueryOutcome>,
}

impl RefreshReport {
  /// An empty report for an invocation over `total` views.
  pub fn new(total: usize) -> Self {
    Self {
      total,
      successes: Vec::new(),
      failures: Vec::new(),
    }
  }

  /// Fold one view's outcome into the report.
  pub fn record(&mut self, outcome: QueryOutcome) {
    if outcome.is_success() {
      self.successes.push(outcome);
    } else {
      self.failures.push(outcome);
    }
  }

  /// Whether every view has been accounted for.
  pub fn is_complete(&self) -> bool {
    self.successes.len() + self.failures.len() == self.total
  }

  pub fn status_code(&self) -> u16 {
    if self.failures.is_empty() {
      STATUS_FULL_SUCCESS
    } else {
      STATUS_PARTIAL_SUCCESS
    }
  }
}

/// The structured result of an invocation.
///
/// Serialized as `{"statusCode": 206, "body": "<report json>", "timestamp": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
  pub status_code: u16,
  #[serde(rename = "body", serialize_with = "report_as_json_string")]
  pub report: RefreshReport,
  /// When the invocation completed.
  pub timestamp: DateTime<Utc>,
}

impl InvocationResult {
  pub fn new(report: RefreshReport, timestamp: DateTime<Utc>) -> Self {
    Self {
      status_code: report.status_code(),
      report,
      timestamp,
    }
  }

  pub fn is_full_success(&self) -> bool {
    self.status_code == STATUS_FULL_SUCCESS
  }
}

fn report_as_json_string<S: Serializer>(
  report: &RefreshReport,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  let body = serde_json::to_string(report).map_err(serde::ser::Error::custom)?;
  serializer.serialize_str(&body)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::outcome::TerminalStatus;

  fn sample_report() -> RefreshReport {
    let mut report = RefreshReport::new(2);
    report.record(QueryOutcome::succeeded("daily_sales", "exec-1"));
    report.record(QueryOutcome::failed(
      "top_users",
      Some("exec-2".to_string()),
      TerminalStatus::Failed,
      "SYNTAX_ERROR",
    ));
    report
  }

  #[test]
  fn test_empty_report_is_full_success() {
    let report = RefreshReport::new(0);
    assert!(report.is_complete());
    assert_eq!(report.status_code(), STATUS_FULL_SUCCESS);
  }

  #[test]
  fn test_record_routes_by_status() {
    let report = sample_report();
    assert_eq!(report.successes.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.is_complete());
    assert_eq!(report.status_code(), STATUS_PARTIAL_SUCCESS);
  }

  #[test]
  fn test_incomplete_report() {
    let mut report = RefreshReport::new(3);
    report.record(QueryOutcome::succeeded("a", "exec-1"));
    assert!(!report.is_complete());
  }

  #[test]
  fn test_report_wire_shape() {
    let json = serde_json::to_value(sample_report()).unwrap();

    assert_eq!(json["total"], 2);
    assert_eq!(json["success"][0]["view"], "daily_sales");
    assert_eq!(json["failed"][0]["error"], "SYNTAX_ERROR");
    assert_eq!(json["failed"][0]["execution_id"], "exec-2");
  }

  #[test]
  fn test_invocation_result_body_is_report_string() {
    let timestamp = DateTime::parse_from_rfc3339("2026-10-15T06:00:00Z")
      .unwrap()
      .with_timezone(&Utc);
    let result = InvocationResult::new(sample_report(), timestamp);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["statusCode"], 206);
    assert_eq!(json["timestamp"], "2026-10-15T06:00:00Z");

    let body: RefreshReport = serde_json::from_str(json["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, sample_report());
    assert!(!result.is_full_success());
  }
}
