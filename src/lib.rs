//! Interview Insights - turn user-interview snippets into a summary and key themes.
//!
//! The library holds the prompt builder, the reply normalizer, the completion
//! client, and the web interface. The `insights` binary wraps it in a CLI.

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod llm;
pub mod models;
pub mod server;
pub mod services;
mod utils;

pub use catalog::StudyCatalog;
pub use error::InsightError;
