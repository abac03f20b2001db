//! Configuration models for coinsight.
//!
//! All I^R (resolvable ignorance) is parameterized here.
//! The user resolves these unknowns at runtime via config file or env vars.

use crate::dispatch::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for coinsight.
///
/// I^R resolved: All configurable parameters are explicit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sonar API configuration (endpoint, credentials, timeouts)
    #[serde(default)]
    pub sonar: SonarConfig,

    /// Dispatch settings (retry policy, fan-out concurrency)
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Sonar API configuration.
///
/// K_i: Sonar speaks the OpenAI-compatible chat completions API.
/// B_i: The endpoint will respond within the subsystem timeout (might fail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonarConfig {
    /// API key (can also be set via the `api_key_env` env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Chat completions endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout for chat and command dispatches, in seconds
    #[serde(default = "default_chat_timeout")]
    pub chat_timeout_secs: u64,

    /// Request timeout for scoring and news dispatches, in seconds
    #[serde(default = "default_analysis_timeout")]
    pub analysis_timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "SONAR_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://api.perplexity.ai/chat/completions".to_string()
}

fn default_chat_timeout() -> u64 {
    90
}

fn default_analysis_timeout() -> u64 {
    120
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            chat_timeout_secs: default_chat_timeout(),
            analysis_timeout_secs: default_analysis_timeout(),
        }
    }
}

impl SonarConfig {
    /// Wall-clock timeout for chat and command dispatches.
    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    /// Wall-clock timeout for scoring and news dispatches.
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

/// Dispatch settings shared by every subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum attempts per dispatch, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds; attempt n waits base × (n-1)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum concurrent units in a fan-out batch
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_concurrency() -> usize {
    16
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl DispatchConfig {
    /// Retry policy derived from these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &std::path::Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the Sonar API key from config or environment.
    ///
    /// B_i(api key available) → Result
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.sonar.api_key {
            return Ok(key.clone());
        }

        std::env::var(&self.sonar.api_key_env).map_err(|_| ConfigError::MissingApiKey {
            env_var: self.sonar.api_key_env.clone(),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing Sonar API key: set {env_var} env var or api_key in config")]
    MissingApiKey { env_var: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sonar.api_key_env, "SONAR_API_KEY");
        assert_eq!(
            config.sonar.base_url,
            "https://api.perplexity.ai/chat/completions"
        );
        assert_eq!(config.sonar.chat_timeout(), Duration::from_secs(90));
        assert_eq!(config.sonar.analysis_timeout(), Duration::from_secs(120));
        assert_eq!(config.dispatch.max_attempts, 3);
        assert_eq!(config.dispatch.base_delay_ms, 500);
    }

    #[test]
    fn test_from_file_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[sonar]
base_url = "http://localhost:8080/chat/completions"
chat_timeout_secs = 5

[dispatch]
base_delay_ms = 10
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.sonar.base_url, "http://localhost:8080/chat/completions");
        assert_eq!(config.sonar.chat_timeout(), Duration::from_secs(5));
        // Unspecified fields keep their defaults
        assert_eq!(config.sonar.analysis_timeout_secs, 120);
        assert_eq!(config.dispatch.max_attempts, 3);
        assert_eq!(
            config.dispatch.retry_policy().base_delay,
            Duration::from_millis(10)
        );
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(std::path::Path::new("/nonexistent/coinsight.toml"))
            .unwrap();
        assert_eq!(config.dispatch.max_attempts, 3);
    }

    #[test]
    fn test_resolve_api_key_from_config() {
        let mut config = Config::default();
        config.sonar.api_key = Some("sk-test".to_string());
        assert_eq!(config.resolve_api_key().unwrap(), "sk-test");
    }
}
