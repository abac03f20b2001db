//! coinsight - Resilient Sonar query orchestration for crypto insight
//! services.
//!
//! ## Architecture
//!
//! coinsight wraps one pattern three ways: forward a templated query to
//! the Sonar completion API and return either the raw payload or a
//! deterministic fallback when the service is unavailable.
//!
//! - **Catalog**: immutable prompt templates and response schemas, one
//!   entry per chat command or scoring category
//! - **Dispatch**: template resolution, retry/backoff with failure
//!   classification, and concurrent fan-out with isolated failure domains
//! - **Services**: the chat, scoring, and news flows built on that core
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Compile-time enforced invariants (types, enums)
//! - B_i (Beliefs): Runtime fallible operations (Result, Option)
//! - I^R (Resolvable): User-configurable parameters
//! - I^B (Bounded): Network/API uncertainties (retry, backoff, fallback)

pub mod catalog;
pub mod client;
pub mod dispatch;
pub mod models;
pub mod service;

// Re-exports for convenience
pub use client::{MockTransport, SonarClient, Transport};
pub use dispatch::{BatchCoordinator, DispatchPlan, DispatchRequest, RetryController, RetryPolicy};
pub use models::{
    BatchResult, CoinsightError, Config, DispatchOutcome, FallbackSpec, Result, TerminalKind,
};
pub use service::{ChatService, NewsService, ScoreService};
