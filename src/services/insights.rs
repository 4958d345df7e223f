//! Snippet analysis service.
//!
//! Ties the catalog, credential provider and completion client together.
//! Separated from UI concerns so the CLI and web server share it.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::StudyCatalog;
use crate::credentials::{CredentialProvider, KeyStore, API_KEY_NAME};
use crate::error::InsightError;
use crate::llm::{normalize, prompts, CompletionService};
use crate::models::{InsightResult, Message, PromptMode, Study};

/// One snippet submission.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightRequest {
    pub study_id: String,
    pub snippet: String,
    #[serde(default)]
    pub mode: PromptMode,
    #[serde(default)]
    pub objective: Option<String>,
}

impl InsightRequest {
    pub fn new(study_id: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            snippet: snippet.into(),
            mode: PromptMode::default(),
            objective: None,
        }
    }

    pub fn with_mode(mut self, mode: PromptMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_objective(mut self, objective: Option<String>) -> Self {
        self.objective = objective;
        self
    }
}

/// Service for turning snippets into insights.
pub struct InsightService {
    catalog: StudyCatalog,
    completions: Arc<dyn CompletionService>,
    credentials: Arc<dyn CredentialProvider>,
    key_store: Option<KeyStore>,
}

impl InsightService {
    /// Create a new service. `key_store` is where `save_key`/`clear_key` write.
    pub fn new(
        catalog: StudyCatalog,
        completions: Arc<dyn CompletionService>,
        credentials: Arc<dyn CredentialProvider>,
        key_store: Option<KeyStore>,
    ) -> Self {
        Self {
            catalog,
            completions,
            credentials,
            key_store,
        }
    }

    pub fn catalog(&self) -> &StudyCatalog {
        &self.catalog
    }

    /// Build the messages for a request without sending them.
    pub fn preview(&self, request: &InsightRequest) -> Result<Vec<Message>, InsightError> {
        let study = self.check_request(request)?;
        Ok(prompts::build_for_study(
            request.mode,
            study,
            request.objective.as_deref(),
            &request.snippet,
        ))
    }

    /// Generate insights for a snippet.
    ///
    /// Input and credential problems are reported before any network call.
    /// Nothing is stored, so a failure leaves no partial state behind.
    pub async fn generate(&self, request: &InsightRequest) -> Result<InsightResult, InsightError> {
        let study = self.check_request(request)?;
        let api_key = self
            .credentials
            .api_key()?
            .ok_or(InsightError::MissingCredential)?;

        let messages = prompts::build_for_study(
            request.mode,
            study,
            request.objective.as_deref(),
            &request.snippet,
        );

        info!(
            "Generating insights for study {} (mode {})",
            study.id, request.mode
        );
        debug!(
            "Prompt has {} messages, {} chars",
            messages.len(),
            messages.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let raw = self.completions.complete(&api_key, &messages).await?;
        let result = normalize(&raw).inspect_err(|e| {
            warn!("Discarding unparseable reply for study {}: {}", study.id, e);
        })?;

        if result.is_empty() {
            warn!("Reply for study {} had no summary or themes", study.id);
        }
        info!(
            "Generated {} themes for study {}",
            result.themes.len(),
            study.id
        );
        Ok(result)
    }

    /// Whether any credential source currently yields a key.
    pub fn has_key(&self) -> Result<bool, InsightError> {
        Ok(self.credentials.api_key()?.is_some())
    }

    /// Validate a key with the completion service, then store it.
    ///
    /// The key store is only written after a successful check.
    pub async fn save_key(&self, key: &str) -> Result<(), InsightError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(InsightError::EmptyInput("API key"));
        }

        self.completions.validate_key(key).await?;

        let store = self.key_store()?;
        store.set(API_KEY_NAME, key)?;
        info!("API key validated and saved to {}", store.path().display());
        Ok(())
    }

    /// Remove the stored key.
    pub fn clear_key(&self) -> Result<(), InsightError> {
        let store = self.key_store()?;
        store.remove(API_KEY_NAME)?;
        info!("API key cleared from {}", store.path().display());
        Ok(())
    }

    fn key_store(&self) -> Result<&KeyStore, InsightError> {
        self.key_store
            .as_ref()
            .ok_or_else(|| InsightError::Storage("no key store configured".to_string()))
    }

    fn check_request(&self, request: &InsightRequest) -> Result<&Study, InsightError> {
        let study = self.catalog.require(&request.study_id)?;
        if request.snippet.trim().is_empty() {
            return Err(InsightError::EmptyInput("snippet"));
        }
        Ok(study)
    }
}
