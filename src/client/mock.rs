//! Mock transport for testing.
//!
//! Allows configuring predetermined outcomes per category without making
//! actual HTTP calls. Responses queue in FIFO order; every call is
//! recorded for assertion.

use crate::client::Transport;
use crate::dispatch::DispatchRequest;
use crate::models::{CoinsightError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Record of a call made to the mock transport.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub category: String,
    pub model: String,
    pub user_prompt: String,
    pub has_schema: bool,
    pub timeout: Duration,
}

/// Mock transport keyed by dispatch category.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<Value>>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a category. Multiple responses for the same
    /// category are returned in FIFO order.
    pub fn push_response(&self, category: &str, response: Result<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry(category.to_string())
            .or_default()
            .push_back(response);
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Total number of transport invocations.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of invocations for one category.
    pub fn calls_for(&self, category: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.category == category)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &DispatchRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(MockCall {
            category: request.category.clone(),
            model: request.model.clone(),
            user_prompt: request.user_prompt.clone(),
            has_schema: request.schema.is_some(),
            timeout: request.timeout,
        });

        let queued = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&request.category)
            .and_then(VecDeque::pop_front);

        match queued {
            Some(response) => response,
            None => Err(CoinsightError::Internal(format!(
                "no mock response configured for category '{}'",
                request.category
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(category: &str) -> DispatchRequest {
        DispatchRequest {
            category: category.to_string(),
            model: "sonar".to_string(),
            system_prompt: "system".to_string(),
            user_prompt: "user".to_string(),
            schema: None,
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(90),
            search: None,
        }
    }

    #[tokio::test]
    async fn test_responses_are_fifo_per_category() {
        let mock = MockTransport::new();
        mock.push_response("flash", Ok(json!({ "n": 1 })));
        mock.push_response("flash", Ok(json!({ "n": 2 })));
        mock.push_response("moon", Ok(json!({ "n": 3 })));

        assert_eq!(mock.send(&request("flash")).await.unwrap()["n"], 1);
        assert_eq!(mock.send(&request("moon")).await.unwrap()["n"], 3);
        assert_eq!(mock.send(&request("flash")).await.unwrap()["n"], 2);
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.calls_for("flash"), 2);
    }

    #[tokio::test]
    async fn test_unconfigured_category_errors() {
        let mock = MockTransport::new();
        let err = mock.send(&request("ghost")).await.unwrap_err();
        assert!(matches!(err, CoinsightError::Internal(_)));
    }
}
