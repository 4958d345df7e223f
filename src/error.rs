//! Error types surfaced to CLI and web callers.

use thiserror::Error;

/// Errors that can occur while generating insights.
///
/// Every variant renders as a short message suitable for showing to the user
/// as-is. None of them are fatal; the user can retry with corrected input.
#[derive(Debug, Error)]
pub enum InsightError {
    /// The completion service rejected the API key (HTTP 401/403).
    #[error("API key appears invalid. Please check and try again.")]
    InvalidCredential,
    /// A required field was blank.
    #[error("Please provide a non-empty {0}.")]
    EmptyInput(&'static str),
    /// No API key is configured anywhere.
    #[error("No API key set. Run `insights key set` first.")]
    MissingCredential,
    /// Network or service failure other than a rejected key.
    #[error("Failed to generate insights: {0}")]
    CallFailed(String),
    /// The reply body was not valid JSON.
    #[error("The model returned a response that is not valid JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    /// Catalog lookup missed.
    #[error("Study not found: {0}")]
    StudyNotFound(String),
    /// A generation is already running.
    #[error("Another snippet is being analyzed. Please wait and try again.")]
    Busy,
    /// Key store could not be read or written.
    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl InsightError {
    /// Map an HTTP status from the completion service to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => InsightError::InvalidCredential,
            _ => InsightError::CallFailed(format!("HTTP {}: {}", status, body)),
        }
    }

    /// Whether this error was detected before any network call was made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            InsightError::EmptyInput(_)
                | InsightError::MissingCredential
                | InsightError::StudyNotFound(_)
        )
    }
}

impl From<std::io::Error> for InsightError {
    fn from(e: std::io::Error) -> Self {
        InsightError::Storage(e.to_string())
    }
}
