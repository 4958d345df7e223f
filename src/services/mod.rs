//! Service layer for interview insights.
//!
//! Domain logic separated from UI concerns, shared by the CLI and web server.

pub mod insights;

pub use insights::{InsightRequest, InsightService};
