//! Retry/backoff controller for a single dispatch.
//!
//! Epistemic foundation:
//! - K_i: At most `max_attempts` transport invocations per dispatch
//! - K_i: Rate-limit and auth failures are terminal; they never consume
//!   further attempts and never convert to a fallback
//! - B_i: A transient failure may succeed on retry → linear backoff
//! - I^B: Exhausted retries collapse into the canonical fallback, so
//!   callers see only a payload or a schema-stable stub

use crate::client::{extract_content, Transport};
use crate::dispatch::DispatchPlan;
use crate::models::{CoinsightError, DispatchOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first
    pub max_attempts: u32,
    /// Base delay; attempt n waits base × (n-1) before running
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Wraps single dispatches with attempt limits, failure classification,
/// linear backoff, and fallback absorption.
pub struct RetryController<T> {
    transport: Arc<T>,
    policy: RetryPolicy,
}

impl<T: Transport> RetryController<T> {
    pub fn new(transport: Arc<T>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run one dispatch to completion.
    ///
    /// Exactly one outcome per call: the raw payload, the plan's canonical
    /// fallback after exhausting transient failures, or a terminal error.
    pub async fn execute(&self, plan: &DispatchPlan) -> DispatchOutcome {
        let mut last_error: Option<CoinsightError> = None;

        for attempt in 1..=self.policy.max_attempts {
            if attempt > 1 {
                let backoff = self.policy.base_delay * (attempt - 1);
                debug!(
                    category = %plan.category,
                    attempt = attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Retrying after transient failure"
                );
                tokio::time::sleep(backoff).await;
            }

            let request = plan.build_request();
            match self.transport.send(&request).await {
                Ok(payload) => {
                    let content_len = extract_content(&payload)
                        .map(|content| content.trim().len())
                        .unwrap_or(0);

                    if content_len >= plan.min_content_len {
                        debug!(
                            category = %plan.category,
                            attempt = attempt,
                            content_len = content_len,
                            "Dispatch succeeded"
                        );
                        return DispatchOutcome::Success(payload);
                    }

                    // A 2xx with unusable content is indistinguishable
                    // from a failed attempt for retry purposes.
                    warn!(
                        category = %plan.category,
                        attempt = attempt,
                        content_len = content_len,
                        "Response content below minimum length"
                    );
                    last_error = Some(CoinsightError::InvalidResponse(format!(
                        "content length {content_len} below minimum {}",
                        plan.min_content_len
                    )));
                }
                Err(error) if error.is_terminal() => {
                    warn!(
                        category = %plan.category,
                        attempt = attempt,
                        error = %error,
                        "Terminal failure, aborting dispatch"
                    );
                    return DispatchOutcome::terminal(&error);
                }
                Err(error) => {
                    warn!(
                        category = %plan.category,
                        attempt = attempt,
                        error = %error,
                        "Attempt failed"
                    );
                    last_error = Some(error);
                }
            }
        }

        let reason = last_error
            .map(|error| error.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        warn!(
            category = %plan.category,
            attempts = self.policy.max_attempts,
            reason = %reason,
            "All retries failed, returning fallback response"
        );
        DispatchOutcome::Fallback {
            payload: plan.fallback.payload(),
            reason,
        }
    }
}
