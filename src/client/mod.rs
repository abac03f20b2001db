//! Sonar transport client module.

mod mock;
mod sonar;

pub use mock::{MockCall, MockTransport};
pub use sonar::{extract_content, Message, SonarClient, Transport};
