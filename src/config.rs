//! Configuration management using the prefer crate.
//!
//! Config files are discovered by `prefer` (e.g. `insights.toml` in the
//! usual config locations) or given explicitly with `--config`, then parsed
//! with serde based on the file extension. Environment variables override
//! file values.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::credentials::KeyStore;
use crate::llm::LlmConfig;
use crate::models::PromptMode;

/// Name used for config discovery.
pub const CONFIG_NAME: &str = "insights";

/// Default bind address for the web server.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// File-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the credential store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Prompt mode used when none is given on the command line or form.
    #[serde(default)]
    pub default_mode: PromptMode,
    /// Web server bind address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Completion client settings.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    pub llm: LlmConfig,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover a config file via prefer. Falls back to defaults.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config {}: {:#}", path.display(), e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file.
    /// Supports TOML, YAML and JSON based on the file extension.
    pub async fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> anyhow::Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let config = match ext {
            "json" => serde_json::from_str(contents).context("Failed to parse JSON config")?,
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).context("Failed to parse YAML config")?
            }
            _ => toml::from_str(contents).context("Failed to parse TOML config")?,
        };
        Ok(config)
    }

    /// Directory containing the config file, for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the credential store.
    pub data_dir: PathBuf,
    /// Prompt mode used when none is given.
    pub default_mode: PromptMode,
    /// Web server bind address.
    pub bind: String,
    /// Completion client settings.
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        // Platform data dir -> home dir -> current dir
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("interview-insights");

        Self {
            data_dir,
            default_mode: PromptMode::default(),
            bind: DEFAULT_BIND.to_string(),
            llm: LlmConfig::default(),
        }
    }
}

impl Settings {
    /// Key store inside the data directory.
    pub fn key_store(&self) -> KeyStore {
        KeyStore::in_dir(&self.data_dir)
    }

    /// Apply file config, resolving relative paths against `base_dir`.
    pub fn apply_config(&mut self, config: &Config, base_dir: &Path) {
        if let Some(ref dir) = config.data_dir {
            self.data_dir = resolve_path(dir, base_dir);
        }
        self.default_mode = config.default_mode;
        if let Some(ref bind) = config.bind {
            self.bind = bind.clone();
        }
        self.llm = config.llm.clone();
    }

    /// Apply environment overrides from an arbitrary lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = lookup("INSIGHTS_DATA_DIR") {
            tracing::debug!("Using INSIGHTS_DATA_DIR from environment: {}", dir);
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(mode) = lookup("INSIGHTS_MODE") {
            match PromptMode::from_str(&mode) {
                Some(m) => self.default_mode = m,
                None => tracing::warn!("Ignoring unknown INSIGHTS_MODE: {}", mode),
            }
        }
        self.llm = self.llm.clone().with_overrides_from(&lookup);
    }
}

fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory override (--data-dir flag).
    pub data_dir: Option<PathBuf>,
}

/// Load settings with explicit options.
///
/// Priority, lowest to highest: defaults, config file, environment, flags.
pub async fn load_settings_with_options(options: LoadOptions) -> anyhow::Result<Settings> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut settings = Settings::default();
    settings.apply_config(&config, &base_dir);
    settings.apply_env(|key| std::env::var(key).ok());

    if let Some(dir) = options.data_dir {
        settings.data_dir = dir;
    }

    Ok(settings)
}
