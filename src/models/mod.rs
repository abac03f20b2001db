//! Shared models: errors, configuration, dispatch outcomes.

mod config;
mod error;
mod outcome;

pub use config::{Config, ConfigError, DispatchConfig, SonarConfig};
pub use error::{CoinsightError, Result};
pub use outcome::{
    service_unavailable_stub, BatchResult, DispatchOutcome, FallbackSpec, TerminalKind,
    UNKNOWN_CATEGORY,
};
