//! Conversational chat and chat command flows.
//!
//! Both wrap the same dispatch core; chat is free-form text while commands
//! are schema-bound lookups in the command catalog.

use crate::catalog::{self, CHAT_SYSTEM_PROMPT};
use crate::client::{extract_content, Transport};
use crate::dispatch::{DispatchPlan, RetryController};
use crate::models::{CoinsightError, Config, DispatchOutcome, FallbackSpec, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Fixed fallback for the single-message chat flow.
pub const CHAT_FALLBACK_TEXT: &str =
    "Sorry, our chat service is temporarily unavailable. Please try again later.";

/// Stub error string for exhausted command dispatches.
pub const COMMAND_UNAVAILABLE: &str = "Chat command service is temporarily unavailable.";

const CHAT_MODEL: &str = "sonar";
const CHAT_MAX_TOKENS: u32 = 500;
const CHAT_TEMPERATURE: f64 = 0.7;
const COMMAND_MAX_TOKENS: u32 = 1000;

/// Responses shorter than this are treated as transient failures.
const MIN_CHAT_CONTENT_LEN: usize = 20;

/// Longest accepted user prompt, in characters.
const MAX_PROMPT_LEN: usize = 1000;

/// Chat subsystem: free-form crypto Q&A plus market-scan commands.
pub struct ChatService<T> {
    controller: Arc<RetryController<T>>,
    timeout: Duration,
}

impl<T: Transport> ChatService<T> {
    pub fn new(controller: Arc<RetryController<T>>, config: &Config) -> Self {
        Self {
            controller,
            timeout: config.sonar.chat_timeout(),
        }
    }

    /// Fetch a chatbot response for a crypto-related query.
    ///
    /// B_i(usable response) → text; retry exhaustion yields the fixed
    /// fallback string instead of an error.
    pub async fn chat(&self, user_prompt: &str) -> Result<String> {
        let trimmed = user_prompt.trim();
        if trimmed.is_empty() {
            return Err(CoinsightError::InvalidInput(
                "user prompt is empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_PROMPT_LEN {
            return Err(CoinsightError::InvalidInput(format!(
                "user prompt exceeds {MAX_PROMPT_LEN} characters"
            )));
        }

        info!(prompt_len = trimmed.len(), "Dispatching chat request");

        let plan = DispatchPlan {
            category: "chat".to_string(),
            model: CHAT_MODEL.to_string(),
            system_prompt: CHAT_SYSTEM_PROMPT.to_string(),
            user_prompt: trimmed.to_string(),
            schema: None,
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
            timeout: self.timeout,
            search: None,
            fallback: FallbackSpec::Text(CHAT_FALLBACK_TEXT),
            min_content_len: MIN_CHAT_CONTENT_LEN,
        };

        match self.controller.execute(&plan).await {
            DispatchOutcome::Success(payload) => extract_content(&payload)
                .map(|content| content.trim().to_string())
                .ok_or_else(|| {
                    CoinsightError::InvalidResponse("no choices in response".to_string())
                }),
            DispatchOutcome::Fallback { payload, .. } => Ok(payload
                .as_str()
                .unwrap_or(CHAT_FALLBACK_TEXT)
                .to_string()),
            DispatchOutcome::TerminalError { kind, message } => Err(kind.into_error(message)),
        }
    }

    /// Fetch the raw schema-bound response for a command (e.g. `MOON`).
    pub async fn command(&self, command: &str) -> Result<Value> {
        if command.trim().is_empty() {
            return Err(CoinsightError::InvalidInput("command is empty".to_string()));
        }

        let config = catalog::commands().lookup(command)?;
        info!(command = %config.display_name, "Dispatching command request");

        let plan = DispatchPlan {
            category: config.key.clone(),
            model: config.model.clone(),
            system_prompt: CHAT_SYSTEM_PROMPT.to_string(),
            user_prompt: config.prompt.clone(),
            schema: config.schema.clone(),
            max_tokens: COMMAND_MAX_TOKENS,
            temperature: 0.0,
            timeout: self.timeout,
            search: None,
            fallback: FallbackSpec::Stub(COMMAND_UNAVAILABLE),
            min_content_len: 1,
        };

        self.controller.execute(&plan).await.into_result()
    }
}
