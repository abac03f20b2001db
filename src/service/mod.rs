//! Subsystem services: chat/commands, scoring, news.

mod chat;
mod news;
mod score;

pub use chat::{ChatService, CHAT_FALLBACK_TEXT, COMMAND_UNAVAILABLE};
pub use news::{NewsService, NEWS_UNAVAILABLE};
pub use score::{ScoreService, ANALYSIS_UNAVAILABLE};
