//! Dispatch outcome models.
//!
//! Epistemic foundation:
//! - K_i: A completed dispatch has exactly one outcome: success, fallback,
//!   or terminal error
//! - K_i: Fallback payloads are fixed per subsystem and schema-stable
//! - B_i: Callers treat fallbacks as success-channel values, never errors

use crate::models::CoinsightError;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Reserved batch key for results that cannot be attributed to any
/// requested category.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Outcome of one completed dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Raw service payload, returned verbatim
    Success(Value),
    /// Canonical stub standing in for a genuine response after retry
    /// exhaustion
    Fallback { payload: Value, reason: String },
    /// Failure that is never retried and never converted to a fallback
    TerminalError { kind: TerminalKind, message: String },
}

/// Classification of a terminal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    /// External service reported a rate-limit status
    RateLimited,
    /// External service rejected the credential
    AuthFailed,
    /// Category unknown or template unresolvable; no attempt was made
    Configuration,
    /// Invariant violation (task panic, closed runtime primitive)
    Internal,
}

impl TerminalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::AuthFailed => "auth_failed",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }

    /// Reconstruct the error this kind was derived from.
    pub fn into_error(self, message: String) -> CoinsightError {
        match self {
            Self::RateLimited => CoinsightError::RateLimited,
            Self::AuthFailed => CoinsightError::AuthFailed,
            Self::Configuration => CoinsightError::InvalidInput(message),
            Self::Internal => CoinsightError::Internal(message),
        }
    }
}

impl std::fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DispatchOutcome {
    /// Build a terminal outcome from a classified error.
    pub fn terminal(error: &CoinsightError) -> Self {
        let kind = match error {
            CoinsightError::RateLimited => TerminalKind::RateLimited,
            CoinsightError::AuthFailed => TerminalKind::AuthFailed,
            CoinsightError::Config(_)
            | CoinsightError::InvalidInput(_)
            | CoinsightError::UnknownCategory(_)
            | CoinsightError::Template { .. } => TerminalKind::Configuration,
            _ => TerminalKind::Internal,
        };
        Self::TerminalError {
            kind,
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Payload carried by a success or fallback outcome.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success(payload) | Self::Fallback { payload, .. } => Some(payload),
            Self::TerminalError { .. } => None,
        }
    }

    /// Convert into a caller-facing result: success and fallback flow
    /// through the success channel, terminal errors are raised.
    pub fn into_result(self) -> crate::models::Result<Value> {
        match self {
            Self::Success(payload) | Self::Fallback { payload, .. } => Ok(payload),
            Self::TerminalError { kind, message } => Err(kind.into_error(message)),
        }
    }

    /// Tagged JSON representation: `{status, response}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(payload) => json!({ "status": "success", "response": payload }),
            Self::Fallback { payload, reason } => json!({
                "status": "fallback",
                "response": payload,
                "reason": reason,
            }),
            Self::TerminalError { kind, message } => json!({
                "status": "error",
                "response": { "error": message, "kind": kind.as_str() },
            }),
        }
    }
}

/// Fallback payload specification for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackSpec {
    /// Fixed literal text (single-message chat)
    Text(&'static str),
    /// Schema-stable completion stub with a human-readable error string
    /// (command / scoring / news)
    Stub(&'static str),
}

impl FallbackSpec {
    pub fn payload(&self) -> Value {
        match self {
            Self::Text(text) => Value::String((*text).to_string()),
            Self::Stub(message) => service_unavailable_stub(message),
        }
    }
}

/// The canonical stub returned when retries are exhausted on a
/// schema-bound dispatch. Structurally identical for every category.
pub fn service_unavailable_stub(message: &str) -> Value {
    json!({
        "choices": [],
        "usage": { "prompt_tokens": 0, "completion_tokens": 0, "total_tokens": 0 },
        "error": message,
    })
}

/// Aggregated fan-out result: one outcome per requested category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    entries: BTreeMap<String, DispatchOutcome>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a unit's outcome. Slots are write-once: the first outcome
    /// for a key wins and later writes for the same key are rejected.
    pub fn insert(&mut self, category: String, outcome: DispatchOutcome) -> bool {
        match self.entries.entry(category) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(outcome);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, category: &str) -> Option<&DispatchOutcome> {
        self.entries.get(category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DispatchOutcome)> {
        self.entries.iter()
    }

    /// JSON representation: `{<category>: {status, response}}`.
    pub fn to_json(&self) -> Value {
        let results: serde_json::Map<String, Value> = self
            .entries
            .iter()
            .map(|(category, outcome)| (category.clone(), outcome.to_json()))
            .collect();
        json!({ "results": results })
    }
}
