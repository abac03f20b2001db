//! News curation flow.
//!
//! Fetches recent items for a set of allowed interest topics within a
//! bounded lookback window, carrying web-search date filters on the
//! request.

use crate::catalog::{self, ALLOWED_INTERESTS};
use crate::client::Transport;
use crate::dispatch::{DispatchPlan, RetryController, SearchWindow};
use crate::models::{CoinsightError, Config, FallbackSpec, Result};
use chrono::{Days, Local, NaiveDate};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Stub error string for exhausted news dispatches.
pub const NEWS_UNAVAILABLE: &str = "News service temporarily unavailable.";

const NEWS_MAX_TOKENS: u32 = 1000;
const MAX_LOOKBACK_DAYS: u32 = 30;

/// Topic used when the caller requests no specific interests.
const DEFAULT_NICHE: &str = "cryptocurrency market trends";

/// News subsystem: curated recent items for crypto topics.
pub struct NewsService<T> {
    controller: Arc<RetryController<T>>,
    timeout: Duration,
}

impl<T: Transport> NewsService<T> {
    pub fn new(controller: Arc<RetryController<T>>, config: &Config) -> Self {
        Self {
            controller,
            timeout: config.sonar.analysis_timeout(),
        }
    }

    /// Fetch the raw news payload for the given interests and lookback.
    pub async fn news(&self, interests: &[String], days: u32) -> Result<Value> {
        if !(1..=MAX_LOOKBACK_DAYS).contains(&days) {
            return Err(CoinsightError::InvalidInput(format!(
                "days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        for interest in interests {
            if !ALLOWED_INTERESTS.contains(&interest.as_str()) {
                return Err(CoinsightError::InvalidInput(format!(
                    "invalid interest: {interest}"
                )));
            }
        }

        let niche = if interests.is_empty() {
            DEFAULT_NICHE.to_string()
        } else {
            interests.join(", ")
        };

        info!(niche = %niche, days = days, "Dispatching news request");

        let today = Local::now().date_naive();
        let plan = self.plan_for(&niche, days, today)?;
        self.controller.execute(&plan).await.into_result()
    }

    fn plan_for(&self, niche: &str, days: u32, today: NaiveDate) -> Result<DispatchPlan> {
        let news = catalog::news();

        let past = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                CoinsightError::Internal(format!("lookback of {days} days underflows the calendar"))
            })?;

        let user_prompt = format!(
            "Fetch up to {max} recent, specific items (articles, discussions, or reports) for \"{niche}\" published within the last {days} days. Ensure diverse domains and subtopics, avoiding generic news roundups, paywalled content, or repetitive sources. Respond with a JSON object matching the provided schema.",
            max = news.max_results,
        );

        Ok(DispatchPlan {
            category: "news".to_string(),
            model: news.model.clone(),
            system_prompt: news.system_prompt.clone(),
            user_prompt,
            schema: Some(news.schema.clone()),
            max_tokens: NEWS_MAX_TOKENS,
            temperature: 0.0,
            timeout: self.timeout,
            search: Some(SearchWindow {
                after: past.format("%m/%d/%Y").to_string(),
                before: today.format("%m/%d/%Y").to_string(),
                max_results: news.max_results,
                context_size: "high".to_string(),
            }),
            fallback: FallbackSpec::Stub(NEWS_UNAVAILABLE),
            min_content_len: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::dispatch::RetryPolicy;

    fn service() -> NewsService<MockTransport> {
        let controller = Arc::new(RetryController::new(
            Arc::new(MockTransport::new()),
            RetryPolicy::default(),
        ));
        NewsService::new(controller, &Config::default())
    }

    #[test]
    fn test_plan_search_window() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 6).unwrap();
        let plan = service().plan_for("DeFi, NFT", 7, today).unwrap();

        let window = plan.search.unwrap();
        assert_eq!(window.before, "08/06/2025");
        assert_eq!(window.after, "07/30/2025");
        assert_eq!(window.max_results, 8);
        assert_eq!(window.context_size, "high");
        assert!(plan.user_prompt.contains("\"DeFi, NFT\""));
        assert!(plan.user_prompt.contains("last 7 days"));
    }

    #[tokio::test]
    async fn test_days_out_of_range_rejected() {
        let svc = service();
        assert!(matches!(
            svc.news(&[], 0).await.unwrap_err(),
            CoinsightError::InvalidInput(_)
        ));
        assert!(matches!(
            svc.news(&[], 31).await.unwrap_err(),
            CoinsightError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_interest_rejected() {
        let svc = service();
        let err = svc
            .news(&["Sports".to_string()], 7)
            .await
            .unwrap_err();
        assert!(matches!(err, CoinsightError::InvalidInput(message) if message.contains("Sports")));
    }
}
