//! Shared helper functions for CLI commands.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use interview_insights::config::Settings;
use interview_insights::credentials::{ChainedCredentials, EnvCredential, StaticCredential};
use interview_insights::llm::OpenAiClient;
use interview_insights::models::InsightResult;
use interview_insights::services::InsightService;
use interview_insights::StudyCatalog;

/// Build the insight service from settings.
///
/// Key lookup order: `--api-key` flag, stored key, `OPENAI_API_KEY`.
pub fn build_service(settings: &Settings, api_key: Option<&str>) -> anyhow::Result<InsightService> {
    let client = OpenAiClient::new(settings.llm.clone())?;
    let key_store = settings.key_store();

    let mut credentials = ChainedCredentials::new();
    if let Some(key) = api_key {
        credentials = credentials.with(StaticCredential::new(key));
    }
    let credentials = credentials.with(key_store.clone()).with(EnvCredential);

    Ok(InsightService::new(
        StudyCatalog::builtin(),
        Arc::new(client),
        Arc::new(credentials),
        Some(key_store),
    ))
}

/// Read snippet text from `--snippet`, `--file`, or stdin (in that order).
pub fn read_snippet(snippet: Option<String>, file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = snippet {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snippet from {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!(
            "{} Paste the interview snippet, then press Ctrl-D:",
            style("→").cyan()
        );
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("Failed to read snippet from stdin")?;
    Ok(text)
}

/// Read a secret without echoing it when attached to a terminal.
pub fn read_secret(prompt: &str) -> anyhow::Result<String> {
    let term = console::Term::stderr();
    if term.is_term() {
        term.write_str(prompt)?;
        return Ok(term.read_secure_line()?);
    }

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line)
}

/// Spinner shown while a request is in flight.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Human-readable rendering of an insight result.
pub fn format_insights(result: &InsightResult) -> String {
    let mut out = String::new();
    if result.summary.is_empty() {
        out.push_str("(no summary returned)\n");
    } else {
        out.push_str(&result.summary);
        out.push('\n');
    }

    if !result.themes.is_empty() {
        out.push_str("\nThemes:\n");
        for (i, theme) in result.themes.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, theme.title));
            if !theme.description.is_empty() {
                out.push_str(&format!("     {}\n", theme.description));
            }
        }
    }
    out
}
