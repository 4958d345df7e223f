//! Data models for interview insights.

mod insight;
mod message;
mod study;

pub use insight::{InsightResult, Theme};
pub use message::{Message, Role};
pub use study::{PromptMode, Study};
