//! Error types for coinsight.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Expected failures (invalid input, unknown category)
//! - I^B materialized: Infrastructure failures (network, timeout, API)
//! - K_i violated: Internal invariant violations (bugs)

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for coinsight.
#[derive(Debug, Error)]
pub enum CoinsightError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED — Belief proven wrong (expected failures)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration not found for category: {0}")]
    UnknownCategory(String),

    #[error("Unresolved placeholder '{placeholder}' in template for category: {category}")]
    Template {
        category: String,
        placeholder: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED — Bounded ignorance became known-bad
    // ═══════════════════════════════════════════════════════════════════

    #[error("Sonar API rate limit exceeded")]
    RateLimited,

    #[error("Sonar API authentication failed: invalid or missing API key")]
    AuthFailed,

    #[error("Sonar API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED — Invariant broken (bug, should not happen)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoinsightError {
    /// Check if this error consumes a retry attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Timeout(_) | Self::Network(_) | Self::InvalidResponse(_)
        )
    }

    /// Check if this error aborts a dispatch immediately, with no further
    /// attempts and no fallback.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RateLimited | Self::AuthFailed)
    }
}

/// Result type alias for coinsight.
pub type Result<T> = std::result::Result<T, CoinsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_and_auth_are_terminal() {
        assert!(CoinsightError::RateLimited.is_terminal());
        assert!(CoinsightError::AuthFailed.is_terminal());
        assert!(!CoinsightError::RateLimited.is_retryable());
        assert!(!CoinsightError::AuthFailed.is_retryable());
    }

    #[test]
    fn test_transient_failures_are_retryable() {
        let api = CoinsightError::Api {
            status: 500,
            message: "server error".to_string(),
        };
        assert!(api.is_retryable());
        assert!(!api.is_terminal());

        let timeout = CoinsightError::Timeout(Duration::from_secs(90));
        assert!(timeout.is_retryable());

        let invalid = CoinsightError::InvalidResponse("empty content".to_string());
        assert!(invalid.is_retryable());
    }

    #[test]
    fn test_config_errors_are_neither() {
        let unknown = CoinsightError::UnknownCategory("bogus".to_string());
        assert!(!unknown.is_retryable());
        assert!(!unknown.is_terminal());
    }
}
