use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable holding the engine workgroup.
pub const ENV_WORKGROUP: &str = "ATHENA_WORKGROUP";
/// Environment variable holding the database queries run against.
pub const ENV_DATABASE: &str = "GLUE_DATABASE";
/// Environment variable holding the query result location.
pub const ENV_OUTPUT_LOCATION: &str = "ATHENA_OUTPUT_LOCATION";
/// Environment variable holding the view mapping as a JSON object.
pub const ENV_NAMED_QUERY_IDS: &str = "NAMED_QUERY_IDS";

/// View name → named query id, in the order the mapping was written.
pub type ViewMap = IndexMap<String, String>;

/// Settings for one refresh invocation.
///
/// # Example
///
/// ```json
/// {
///   "workgroup": "analytics",
///   "database": "warehouse",
///   "output_location": "s3://query-results/views/",
///   "views": {
///     "daily_sales": "5b7c2c3e-...",
///     "top_users": "9f1d0a44-..."
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
  /// Workgroup the queries are metered against.
  pub workgroup: String,
  /// Database (schema) the queries execute in.
  pub database: String,
  /// URI the engine writes query results to.
  pub output_location: String,
  /// Views to refresh.
  #[serde(default)]
  pub views: ViewMap,
}

impl Configuration {
  /// Load configuration from the process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Load configuration using `lookup` to resolve each environment key.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let require = |key: &str| {
      lookup(key).ok_or_else(|| ConfigError::Missing {
        key: key.to_string(),
      })
    };

    let workgroup = require(ENV_WORKGROUP)?;
    let database = require(ENV_DATABASE)?;
    let output_location = require(ENV_OUTPUT_LOCATION)?;
    let views_json = require(ENV_NAMED_QUERY_IDS)?;

    let views: ViewMap = serde_json::from_str(&views_json)
      .map_err(|source| ConfigError::InvalidViews { source })?;

    let config = Self {
      workgroup,
      database,
      output_location,
      views,
    };
    config.validate()?;
    Ok(config)
  }

  /// Load configuration from a JSON file.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.validate()?;
    Ok(config)
  }

  /// Check that every scalar setting is non-blank.
  ///
  /// The view mapping may be empty; that is a valid no-op run.
  pub fn validate(&self) -> Result<(), ConfigError> {
    for (key, value) in [
      (ENV_WORKGROUP, &self.workgroup),
      (ENV_DATABASE, &self.database),
      (ENV_OUTPUT_LOCATION, &self.output_location),
    ] {
      if value.trim().is_empty() {
        return Err(ConfigError::Blank {
          key: key.to_string(),
        });
      }
    }
    Ok(())
  }

  /// Number of views in this invocation.
  pub fn view_count(&self) -> usize {
    self.views.len()
  }
}
