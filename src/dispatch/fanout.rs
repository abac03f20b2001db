//! Fan-out coordinator for concurrent multi-category dispatch.
//!
//! Epistemic foundation:
//! - K_i: Every requested category settles exactly once; none are dropped
//! - K_i: Units share no mutable state; aggregation slots are disjoint by
//!   key, so no locking discipline is needed beyond key uniqueness
//! - B_i: Any unit may fail without affecting its siblings → no
//!   cross-unit cancellation

use crate::client::Transport;
use crate::dispatch::{DispatchPlan, RetryController};
use crate::models::{
    BatchResult, CoinsightError, DispatchOutcome, Result, TerminalKind, UNKNOWN_CATEGORY,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Runs one retry-wrapped dispatch per category concurrently and
/// aggregates every outcome into a single keyed batch result.
pub struct BatchCoordinator<T> {
    controller: Arc<RetryController<T>>,
    semaphore: Arc<Semaphore>,
}

impl<T: Transport + 'static> BatchCoordinator<T> {
    pub fn new(controller: Arc<RetryController<T>>, max_concurrency: usize) -> Self {
        Self {
            controller,
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Settle every unit and return one outcome per requested category.
    ///
    /// Units whose plan failed to resolve (unknown category, unresolved
    /// template) settle immediately as terminal errors; the rest run as
    /// independent tasks. The call returns only after every unit has
    /// settled, so batch wall-clock is bounded by the slowest unit.
    pub async fn execute_batch(&self, units: Vec<(String, Result<DispatchPlan>)>) -> BatchResult {
        let mut batch = BatchResult::new();
        let mut handles = Vec::with_capacity(units.len());

        for (category, plan) in units {
            if batch.contains(&category)
                || handles.iter().any(|(key, _)| *key == category)
            {
                continue;
            }

            match plan {
                Err(error) => {
                    warn!(category = %category, error = %error, "Unit failed before dispatch");
                    batch.insert(category, DispatchOutcome::terminal(&error));
                }
                Ok(plan) => {
                    let controller = Arc::clone(&self.controller);
                    let semaphore = Arc::clone(&self.semaphore);
                    let task_category = category.clone();
                    let handle = tokio::spawn(async move {
                        let _permit = match semaphore.acquire_owned().await {
                            Ok(permit) => permit,
                            Err(_) => {
                                return (
                                    task_category,
                                    DispatchOutcome::TerminalError {
                                        kind: TerminalKind::Internal,
                                        message: "dispatch semaphore closed".to_string(),
                                    },
                                );
                            }
                        };
                        let outcome = controller.execute(&plan).await;
                        (task_category, outcome)
                    });
                    handles.push((category, handle));
                }
            }
        }

        for (category, handle) in handles {
            match handle.await {
                Ok((settled_category, outcome)) => {
                    // The slot key comes from the task itself; a label that
                    // matches no reserved slot is quarantined under the
                    // reserved key rather than dropped or misfiled.
                    if settled_category == category {
                        batch.insert(category, outcome);
                    } else {
                        warn!(
                            expected = %category,
                            settled = %settled_category,
                            "Unit settled under an unexpected category"
                        );
                        batch.insert(UNKNOWN_CATEGORY.to_string(), outcome);
                        batch.insert(
                            category.clone(),
                            DispatchOutcome::TerminalError {
                                kind: TerminalKind::Internal,
                                message: format!("unit for '{category}' settled under '{settled_category}'"),
                            },
                        );
                    }
                }
                Err(join_error) => {
                    warn!(category = %category, error = %join_error, "Batch unit panicked");
                    batch.insert(
                        category,
                        DispatchOutcome::terminal(&CoinsightError::Internal(format!(
                            "batch unit failed: {join_error}"
                        ))),
                    );
                }
            }
        }

        info!(
            units = batch.len(),
            successes = batch.iter().filter(|(_, o)| o.is_success()).count(),
            fallbacks = batch.iter().filter(|(_, o)| o.is_fallback()).count(),
            "Batch settled"
        );
        batch
    }
}
