//! Insight results returned for a snippet.

use serde::{Deserialize, Serialize};

/// A short titled insight extracted from a snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Theme {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Summary and themes for one snippet submission. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightResult {
    pub summary: String,
    pub themes: Vec<Theme>,
}

impl InsightResult {
    /// Whether the model gave us nothing usable.
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.themes.is_empty()
    }
}
