//! Research studies and prompt modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A research study that interview snippets are analyzed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    /// Stable identifier used in URLs and on the command line.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Free-text description of what the study is trying to learn.
    pub description: String,
    /// Persona label for the interviewed participants.
    pub persona: String,
}

impl Study {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            persona: persona.into(),
        }
    }
}

/// Strategy controlling how the request to the completion service is phrased.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Plain summary plus three themes.
    #[default]
    Default,
    /// Decision-ready phrasing framed for a product researcher.
    Researcher,
    /// Two-stage reasoning: observations first, then themes.
    Stepwise,
}

impl PromptMode {
    pub const ALL: [PromptMode; 3] = [Self::Default, Self::Researcher, Self::Stepwise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Researcher => "researcher",
            Self::Stepwise => "stepwise",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "researcher" => Some(Self::Researcher),
            "stepwise" => Some(Self::Stepwise),
            _ => None,
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(PromptMode::from_str("default"), Some(PromptMode::Default));
        assert_eq!(
            PromptMode::from_str(" Researcher "),
            Some(PromptMode::Researcher)
        );
        assert_eq!(PromptMode::from_str("STEPWISE"), Some(PromptMode::Stepwise));
        assert_eq!(PromptMode::from_str("chain"), None);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in PromptMode::ALL {
            assert_eq!(PromptMode::from_str(mode.as_str()), Some(mode));
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn test_mode_serde_lowercase() {
        let json = serde_json::to_string(&PromptMode::Stepwise).unwrap();
        assert_eq!(json, "\"stepwise\"");
        let mode: PromptMode = serde_json::from_str("\"researcher\"").unwrap();
        assert_eq!(mode, PromptMode::Researcher);
    }
}
