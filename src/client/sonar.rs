//! Sonar transport client.
//!
//! Epistemic foundation:
//! - K_i: Sonar speaks the OpenAI-compatible chat completions API
//! - B_i: API will respond within timeout (might fail)
//! - B_i: Response will be valid JSON (might fail)
//! - I^B: 429/401 statuses are terminal; everything else is transient

use crate::dispatch::DispatchRequest;
use crate::models::{CoinsightError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Seam between the orchestration core and the network. The production
/// implementation is [`SonarClient`]; tests use
/// [`MockTransport`](crate::client::MockTransport).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one completion request and return the raw response payload.
    async fn send(&self, request: &DispatchRequest) -> Result<Value>;
}

/// Message in a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Chat completion request payload.
#[derive(Debug, Serialize)]
struct CompletionPayload {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_after_date_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_before_date_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_search_options: Option<WebSearchOptions>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    schema: Value,
}

#[derive(Debug, Serialize)]
struct WebSearchOptions {
    search_context_size: String,
}

/// API error response (OpenAI-compatible).
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl CompletionPayload {
    fn from_request(request: &DispatchRequest) -> Self {
        let (after, before, max_results, options) = match &request.search {
            Some(window) => (
                Some(window.after.clone()),
                Some(window.before.clone()),
                Some(window.max_results),
                Some(WebSearchOptions {
                    search_context_size: window.context_size.clone(),
                }),
            ),
            None => (None, None, None, None),
        };

        Self {
            model: request.model.clone(),
            messages: vec![
                Message::system(request.system_prompt.clone()),
                Message::user(request.user_prompt.clone()),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.schema.clone().map(|schema| ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat { schema },
            }),
            search_after_date_filter: after,
            search_before_date_filter: before,
            max_results,
            web_search_options: options,
        }
    }
}

/// Extract the completion text from a raw response payload.
pub fn extract_content(payload: &Value) -> Option<&str> {
    payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

/// Production Sonar client over reqwest.
pub struct SonarClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl SonarClient {
    /// Create a new Sonar client.
    ///
    /// # Arguments
    /// - `api_key`: Bearer credential for the completions endpoint
    /// - `base_url`: Full chat-completions URL
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(CoinsightError::Network)?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| CoinsightError::InvalidInput("API key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for SonarClient {
    async fn send(&self, request: &DispatchRequest) -> Result<Value> {
        let payload = CompletionPayload::from_request(request);

        debug!(
            category = %request.category,
            model = %request.model,
            timeout_secs = request.timeout.as_secs(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .headers(self.headers.clone())
            .json(&payload)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoinsightError::Timeout(request.timeout)
                } else {
                    CoinsightError::Network(e)
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(CoinsightError::RateLimited);
        }
        if status == 401 {
            return Err(CoinsightError::AuthFailed);
        }
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => api_error.error.message,
                Err(_) => body,
            };
            return Err(CoinsightError::Api { status, message });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| CoinsightError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(
            category = %request.category,
            content_len = extract_content(&payload).map(str::len).unwrap_or(0),
            "Completion request succeeded"
        );

        Ok(payload)
    }
}
