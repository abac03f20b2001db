//! Request dispatch: template resolution, sanitization, retry, fan-out.
//!
//! Epistemic foundation:
//! - K_i: A request is built fresh per attempt and never mutated
//! - K_i: Unresolved placeholders are a config/caller error, caught before
//!   any network call
//! - B_i: Each dispatch may succeed or fail → DispatchOutcome

mod fanout;
mod retry;

pub use fanout::BatchCoordinator;
pub use retry::{RetryController, RetryPolicy};

use crate::models::{CoinsightError, FallbackSpec, Result};
use serde_json::Value;
use std::time::Duration;

/// Web-search window attached to news dispatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWindow {
    /// Earliest publication date, MM/DD/YYYY
    pub after: String,
    /// Latest publication date, MM/DD/YYYY
    pub before: String,
    /// Maximum items the service should return
    pub max_results: u32,
    /// Search context size hint ("low", "medium", "high")
    pub context_size: String,
}

/// One network-bound request description. Created fresh per attempt,
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub category: String,
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub schema: Option<Value>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
    pub search: Option<SearchWindow>,
}

/// A resolved dispatch: everything needed to mint requests for each
/// attempt, plus the retry classification knobs.
#[derive(Debug, Clone)]
pub struct DispatchPlan {
    pub category: String,
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub schema: Option<Value>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
    pub search: Option<SearchWindow>,
    /// Canonical payload returned when retries are exhausted
    pub fallback: FallbackSpec,
    /// Minimum usable content length; shorter successful responses are
    /// treated as transient failures
    pub min_content_len: usize,
}

impl DispatchPlan {
    /// Mint a fresh request for one attempt.
    pub fn build_request(&self) -> DispatchRequest {
        DispatchRequest {
            category: self.category.clone(),
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            user_prompt: self.user_prompt.clone(),
            schema: self.schema.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
            search: self.search.clone(),
        }
    }
}

/// Strip ASCII control characters (tab, newline, carriage return become a
/// single space) and drop bytes outside the printable ASCII range. Input
/// semantics are otherwise untouched.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            ' '..='~' => Some(c),
            _ => None,
        })
        .collect()
}

/// Substitute every `{{name}}` placeholder with its sanitized input value.
/// A placeholder left unresolved after substitution fails fast, before any
/// network call.
pub fn render_template(category: &str, template: &str, inputs: &[(&str, &str)]) -> Result<String> {
    let mut rendered = template.to_string();
    for (name, value) in inputs {
        rendered = rendered.replace(&format!("{{{{{name}}}}}"), &sanitize(value));
    }

    if let Some(start) = rendered.find("{{") {
        let rest = &rendered[start + 2..];
        let placeholder = rest
            .split("}}")
            .next()
            .unwrap_or(rest)
            .to_string();
        return Err(CoinsightError::Template {
            category: category.to_string(),
            placeholder,
        });
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_control_chars_become_spaces() {
        assert_eq!(sanitize("a\tb\nc\rd"), "a b c d");
    }

    #[test]
    fn test_sanitize_drops_non_printable() {
        assert_eq!(sanitize("eth\u{0}ereum"), "ethereum");
        assert_eq!(sanitize("caf\u{e9}"), "caf");
        assert_eq!(sanitize("plain text stays"), "plain text stays");
    }

    #[test]
    fn test_render_substitutes_all_occurrences() {
        let rendered = render_template(
            "audit",
            r#"Audit "{{asset}}" on "{{network}}"; repeat: {{asset}}"#,
            &[("asset", "Ethereum"), ("network", "Ethereum")],
        )
        .unwrap();
        assert_eq!(rendered, r#"Audit "Ethereum" on "Ethereum"; repeat: Ethereum"#);
    }

    #[test]
    fn test_render_sanitizes_inputs() {
        let rendered = render_template(
            "audit",
            "Audit {{asset}}",
            &[("asset", "Ether\neum\u{1}")],
        )
        .unwrap();
        assert_eq!(rendered, "Audit Ether eum");
    }

    #[test]
    fn test_render_fails_fast_on_unresolved_placeholder() {
        let err = render_template("audit", "Audit {{asset}} on {{network}}", &[("asset", "ETH")])
            .unwrap_err();
        match err {
            CoinsightError::Template {
                category,
                placeholder,
            } => {
                assert_eq!(category, "audit");
                assert_eq!(placeholder, "network");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_request_is_a_fresh_copy() {
        let plan = DispatchPlan {
            category: "flash".to_string(),
            model: "sonar".to_string(),
            system_prompt: "system".to_string(),
            user_prompt: "user".to_string(),
            schema: None,
            max_tokens: 1000,
            temperature: 0.0,
            timeout: Duration::from_secs(90),
            search: None,
            fallback: FallbackSpec::Stub("unavailable"),
            min_content_len: 1,
        };
        let first = plan.build_request();
        let second = plan.build_request();
        assert_eq!(first, second);
        assert_eq!(first.category, "flash");
    }
}
