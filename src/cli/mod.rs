//! Command-line interface for interview insights.

mod commands;
pub mod helpers;

pub use commands::{is_verbose, run};
