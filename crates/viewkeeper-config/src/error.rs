//! Configuration errors.

use std::path::PathBuf;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// A required setting is not present.
  #[error("missing required setting '{key}'")]
  Missing { key: String },

  /// A required setting is present but empty.
  #[error("setting '{key}' must not be blank")]
  Blank { key: String },

  /// The view mapping is not a JSON object of string values.
  #[error("invalid view mapping: {source}")]
  InvalidViews {
    #[source]
    source: serde_json::Error,
  },

  /// Failed to read a configuration file.
  #[error("failed to read config file {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Failed to parse a configuration file.
  #[error("failed to parse config file {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}
