//! Multi-category scoring flow.
//!
//! One retry-wrapped dispatch per analysis category, fanned out
//! concurrently; the batch settles as a whole and every category reports
//! its own outcome.

use crate::catalog::{self, ANALYSIS_SYSTEM_PROMPT};
use crate::client::Transport;
use crate::dispatch::{render_template, BatchCoordinator, DispatchPlan, RetryController};
use crate::models::{BatchResult, CoinsightError, Config, FallbackSpec, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Stub error string for exhausted scoring dispatches.
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis service temporarily unavailable.";

const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// Longest accepted asset/network field, in characters.
const MAX_FIELD_LEN: usize = 100;

/// Scoring subsystem: concurrent per-category analysis of an
/// asset/network pair.
pub struct ScoreService<T> {
    coordinator: BatchCoordinator<T>,
    timeout: Duration,
}

impl<T: Transport + 'static> ScoreService<T> {
    pub fn new(controller: Arc<RetryController<T>>, config: &Config) -> Self {
        Self {
            coordinator: BatchCoordinator::new(controller, config.dispatch.max_concurrency),
            timeout: config.sonar.analysis_timeout(),
        }
    }

    /// Score an asset/network pair across the requested categories.
    ///
    /// An empty category list selects every catalog category. Unknown
    /// categories settle as per-unit terminal errors; they never fail the
    /// batch.
    pub async fn score(
        &self,
        asset: &str,
        network: &str,
        categories: &[String],
    ) -> Result<BatchResult> {
        let asset = validated_field("asset", asset)?;
        let network = validated_field("network", network)?;

        let selected: Vec<String> = if categories.is_empty() {
            catalog::categories()
                .keys()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            categories.iter().map(|c| catalog::normalize(c)).collect()
        };

        info!(
            asset = %asset,
            network = %network,
            categories = selected.len(),
            "Processing score request"
        );

        let units = selected
            .into_iter()
            .map(|key| {
                let plan = self.plan_for(&key, &asset, &network);
                (key, plan)
            })
            .collect();

        Ok(self.coordinator.execute_batch(units).await)
    }

    fn plan_for(&self, key: &str, asset: &str, network: &str) -> Result<DispatchPlan> {
        let config = catalog::categories().lookup(key)?;
        let user_prompt = render_template(
            &config.key,
            &config.prompt,
            &[("asset", asset), ("network", network)],
        )?;

        Ok(DispatchPlan {
            category: config.key.clone(),
            model: config.model.clone(),
            system_prompt: ANALYSIS_SYSTEM_PROMPT.to_string(),
            user_prompt,
            schema: config.schema.clone(),
            max_tokens: ANALYSIS_MAX_TOKENS,
            temperature: 0.0,
            timeout: self.timeout,
            search: None,
            fallback: FallbackSpec::Stub(ANALYSIS_UNAVAILABLE),
            min_content_len: 1,
        })
    }
}

fn validated_field(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_FIELD_LEN {
        return Err(CoinsightError::InvalidInput(format!(
            "{name} must be a string between 1 and {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_field_bounds() {
        assert_eq!(validated_field("asset", "  Ethereum ").unwrap(), "Ethereum");
        assert!(validated_field("asset", "").is_err());
        assert!(validated_field("asset", "   ").is_err());
        assert!(validated_field("network", &"x".repeat(101)).is_err());
        assert!(validated_field("network", &"x".repeat(100)).is_ok());
    }
}
