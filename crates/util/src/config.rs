//! Runtime configuration for graphctl.
//!
//! Configuration is a small JSON document stored in the standard
//! configuration directory (`~/.config/graphctl/config.json` on most
//! platforms). Every field is optional; missing fields take their defaults.
//!
//! ```json
//! {
//!   "graph_base_url": "https://graph.microsoft.com",
//!   "max_pages": 1000,
//!   "request_timeout_secs": 30,
//!   "invocation_timeout_secs": 300
//! }
//! ```
//!
//! `max_pages` is the pagination safety ceiling: a collection that needs
//! more pages than this fails with an explicit error instead of looping
//! forever against a misbehaving server. Raise it for very large tenants.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dirs_next::config_dir;
use graphctl_api::DEFAULT_GRAPH_BASE_URL;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "GRAPHCTL_CONFIG_PATH";
/// Environment variable overriding [`CliConfig::graph_base_url`].
pub const GRAPH_BASE_ENV: &str = "GRAPHCTL_GRAPH_BASE";
/// Environment variable overriding [`CliConfig::max_pages`].
pub const MAX_PAGES_ENV: &str = "GRAPHCTL_MAX_PAGES";

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_MAX_PAGES: usize = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidOverride {
        variable: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Graph endpoint all command URLs are built from.
    pub graph_base_url: String,
    /// Pagination safety ceiling, in pages per collection.
    pub max_pages: usize,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout_secs: u64,
    /// Optional deadline for a whole invocation, including every page.
    pub invocation_timeout_secs: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            invocation_timeout_secs: None,
        }
    }
}

impl CliConfig {
    /// Load from the default path and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from `path` and apply environment overrides.
    ///
    /// A missing file yields defaults. A file that fails to parse is logged
    /// and ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = read_config_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn invocation_timeout(&self) -> Option<Duration> {
        self.invocation_timeout_secs.map(Duration::from_secs)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(base) = env::var(GRAPH_BASE_ENV)
            && !base.trim().is_empty()
        {
            self.graph_base_url = base.trim().to_string();
        }
        if let Ok(raw) = env::var(MAX_PAGES_ENV)
            && !raw.trim().is_empty()
        {
            self.max_pages = raw.trim().parse().map_err(|error: std::num::ParseIntError| ConfigError::InvalidOverride {
                variable: MAX_PAGES_ENV,
                value: raw.clone(),
                reason: error.to_string(),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pages == 0 {
            return Err(ConfigError::Invalid("max_pages must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Get the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("graphctl")
        .join(CONFIG_FILE_NAME)
}

fn read_config_file(path: &Path) -> Result<CliConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(config) => Ok(config),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse config file; using defaults"
                );
                Ok(CliConfig::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(CliConfig::default()),
        Err(error) => Err(ConfigError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn without_overrides<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars_unset([GRAPH_BASE_ENV, MAX_PAGES_ENV, CONFIG_PATH_ENV], f)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = without_overrides(|| CliConfig::load_from(&dir.path().join("absent.json"))).expect("config");
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.invocation_timeout(), None);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "max_pages": 5, "invocation_timeout_secs": 60 }"#).expect("write");

        let config = without_overrides(|| CliConfig::load_from(&path)).expect("config");
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.invocation_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.graph_base_url, DEFAULT_GRAPH_BASE_URL);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").expect("write");

        let config = without_overrides(|| CliConfig::load_from(&path)).expect("config");
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn environment_overrides_win_over_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "max_pages": 5 }"#).expect("write");

        let config = temp_env::with_vars(
            [(MAX_PAGES_ENV, Some("12")), (GRAPH_BASE_ENV, Some("http://localhost:9000"))],
            || CliConfig::load_from(&path),
        )
        .expect("config");
        assert_eq!(config.max_pages, 12);
        assert_eq!(config.graph_base_url, "http://localhost:9000");
    }

    #[test]
    fn invalid_override_is_reported() {
        let dir = tempdir().expect("tempdir");
        let error = temp_env::with_var(MAX_PAGES_ENV, Some("lots"), || CliConfig::load_from(&dir.path().join("absent.json")))
            .expect_err("non-numeric ceiling");
        assert!(matches!(error, ConfigError::InvalidOverride { variable: MAX_PAGES_ENV, .. }), "{:?}", error);
    }

    #[test]
    fn zero_page_ceiling_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "max_pages": 0 }"#).expect("write");
        let error = without_overrides(|| CliConfig::load_from(&path)).expect_err("zero ceiling");
        assert!(error.to_string().contains("max_pages"));
    }

    #[test]
    fn config_path_override_is_used() {
        let path = temp_env::with_var(CONFIG_PATH_ENV, Some("/tmp/graphctl/custom.json"), default_config_path);
        assert_eq!(path, PathBuf::from("/tmp/graphctl/custom.json"));
    }
}
