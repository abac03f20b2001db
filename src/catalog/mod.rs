//! Immutable prompt catalogs.
//!
//! Epistemic foundation:
//! - K_i: Catalogs are loaded once and never mutated; concurrent lookups
//!   need no synchronization
//! - K_i: Keys are unique within a catalog and case-normalized
//! - B_i: A lookup may miss → Result

mod categories;
mod commands;
mod news;

pub use categories::ANALYSIS_SYSTEM_PROMPT;
pub use commands::CHAT_SYSTEM_PROMPT;
pub use news::{NewsConfig, ALLOWED_INTERESTS, NEWS_SYSTEM_PROMPT};

use crate::models::{CoinsightError, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

/// URL pattern shared by every response schema.
const URL_PATTERN: &str = r"^https?:\/\/(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_\+.~#?&//=]*)$";

/// MM/DD/YYYY publication date pattern.
const DATE_PATTERN: &str = r"^(0[1-9]|1[0-2])\/(0[1-9]|[12][0-9]|3[01])\/\d{4}$";

pub(crate) fn url_string() -> Value {
    json!({ "type": "string", "pattern": URL_PATTERN })
}

pub(crate) fn date_string() -> Value {
    json!({ "type": "string", "pattern": DATE_PATTERN })
}

pub(crate) fn source_list() -> Value {
    json!({ "type": "array", "items": url_string() })
}

/// One catalog entry: a request template bound to a category key.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    /// Canonical (lowercase) lookup key
    pub key: String,
    /// Human-readable category name, e.g. "Flash", "Audit"
    pub display_name: String,
    /// Model identifier for this category
    pub model: String,
    /// What this category retrieves
    pub description: String,
    /// User prompt template; `{{name}}` placeholders are resolved at
    /// dispatch time
    pub prompt: String,
    /// JSON Schema descriptor for the expected response content
    pub schema: Option<Value>,
    /// Error-code labels associated with this category
    pub labels: ErrorLabels,
}

/// Error-code labels for one category, generated uniformly from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLabels {
    pub service_failed: String,
    pub invalid_response: String,
    pub invalid_input: String,
    pub invalid_command: String,
    pub process: String,
}

impl ErrorLabels {
    pub fn for_name(name: &str) -> Self {
        let name = name.to_ascii_uppercase();
        Self {
            service_failed: format!("{name}_SERVICE_FAILED"),
            invalid_response: format!("{name}_SERVICE_INVALID_RESPONSE"),
            invalid_input: format!("INVALID_{name}_INPUT"),
            invalid_command: format!("INVALID_{name}_COMMAND"),
            process: format!("PROCESS_{name}_ERROR"),
        }
    }
}

/// Canonical form for catalog keys: trimmed, lowercase.
pub fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// A read-only mapping from canonical category key to its configuration.
#[derive(Debug)]
pub struct Catalog {
    name: &'static str,
    entries: HashMap<String, CategoryConfig>,
}

impl Catalog {
    fn new(name: &'static str, configs: Vec<CategoryConfig>) -> Self {
        let mut entries = HashMap::with_capacity(configs.len());
        for config in configs {
            let key = config.key.clone();
            if entries.insert(key.clone(), config).is_some() {
                // Duplicate keys in embedded data are a build-time mistake.
                panic!("duplicate key '{key}' in {name} catalog");
            }
        }
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, key: &str) -> Result<&CategoryConfig> {
        let canonical = normalize(key);
        self.entries
            .get(&canonical)
            .ok_or(CoinsightError::UnknownCategory(canonical))
    }

    /// All canonical keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static COMMANDS: LazyLock<Catalog> = LazyLock::new(|| Catalog::new("command", commands::build()));
static CATEGORIES: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new("analysis", categories::build()));
static NEWS: LazyLock<NewsConfig> = LazyLock::new(news::build);

/// Chat command catalog (DROP, FLASH, MOON, ...).
pub fn commands() -> &'static Catalog {
    &COMMANDS
}

/// Scoring category catalog (audit, team, tokenomics, ...).
pub fn categories() -> &'static Catalog {
    &CATEGORIES
}

/// News curation configuration.
pub fn news() -> &'static NewsConfig {
    &NEWS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let lower = commands().lookup("flash").unwrap();
        let upper = commands().lookup("FLASH").unwrap();
        assert_eq!(lower.key, upper.key);
        assert_eq!(lower.prompt, upper.prompt);
        assert_eq!(lower.display_name, "Flash");

        let padded = categories().lookup("  Audit ").unwrap();
        assert_eq!(padded.key, "audit");
    }

    #[test]
    fn test_lookup_unknown_key() {
        let err = commands().lookup("unknown_key").unwrap_err();
        assert!(matches!(err, CoinsightError::UnknownCategory(key) if key == "unknown_key"));
    }

    #[test]
    fn test_repeated_lookups_are_idempotent() {
        let first = categories().lookup("team").unwrap();
        let second = categories().lookup("team").unwrap();
        assert_eq!(first.model, second.model);
        assert_eq!(first.schema, second.schema);
        assert_eq!(first.labels, second.labels);
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(commands().len(), 11);
        assert_eq!(categories().len(), 13);
    }

    #[test]
    fn test_error_labels_are_uniform() {
        for key in commands().keys() {
            let config = commands().lookup(key).unwrap();
            let name = config.display_name.to_ascii_uppercase();
            assert_eq!(config.labels, ErrorLabels::for_name(&name));
            assert_eq!(
                config.labels.invalid_input,
                format!("INVALID_{name}_INPUT")
            );
        }
    }

    #[test]
    fn test_every_command_schema_has_status_key() {
        for key in commands().keys() {
            let config = commands().lookup(key).unwrap();
            let schema = config.schema.as_ref().unwrap();
            let status_key = format!("{key}_status");
            assert!(
                schema["properties"][&status_key].is_object(),
                "missing {status_key} in {key} schema"
            );
            assert_eq!(schema["properties"]["coins"]["maxItems"], 5);
        }
    }

    #[test]
    fn test_category_prompts_use_known_placeholders() {
        for key in categories().keys() {
            let config = categories().lookup(key).unwrap();
            assert!(config.prompt.contains("{{asset}}"), "no asset in {key}");
            assert!(config.prompt.contains("{{network}}"), "no network in {key}");
            assert!(config.schema.is_some());
        }
    }

    #[test]
    fn test_value_category_uses_reasoning_model() {
        assert_eq!(categories().lookup("value").unwrap().model, "sonar-reasoning-pro");
        assert_eq!(categories().lookup("audit").unwrap().model, "sonar-pro");
        assert_eq!(commands().lookup("moon").unwrap().model, "sonar");
    }
}
