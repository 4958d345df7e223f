//! LLM integration for interview snippet analysis.
//!
//! [`prompts`] builds the message list, [`client`] sends it, and
//! [`normalize`] turns the reply into an [`crate::models::InsightResult`].

mod client;
pub mod normalize;
pub mod prompts;

pub use client::{CompletionService, LlmConfig, OpenAiClient};
pub use normalize::normalize;
