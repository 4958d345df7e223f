//! API credential providers.
//!
//! Whatever issues a completion request gets a [`CredentialProvider`] handed
//! to it instead of reading a global. Absence of a key is `Ok(None)`, never
//! an error.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::InsightError;

/// Fixed key name under which the API key is stored.
pub const API_KEY_NAME: &str = "openai-api-key";

/// Environment variable read by [`EnvCredential`].
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Source of the API key used for completion requests.
pub trait CredentialProvider: Send + Sync {
    /// Return the key if one is configured. Blank keys count as absent.
    fn api_key(&self) -> Result<Option<String>, InsightError>;
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// File-backed string key-value store.
///
/// The file is a flat JSON object. Each call reads or rewrites the file, so
/// several processes see each other's changes.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file inside a data directory.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::open(data_dir.join("credentials.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, InsightError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Set a value. An empty value removes the entry.
    pub fn set(&self, key: &str, value: &str) -> Result<(), InsightError> {
        if value.is_empty() {
            return self.remove(key);
        }
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    /// Remove a value. Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), InsightError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&entries)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, InsightError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            InsightError::Storage(format!("{} is not a valid key store: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), InsightError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| InsightError::Storage(e.to_string()))?;
        let mut file = open_private(&self.path)?;
        file.write_all(json.as_bytes())?;
        // A file created by an older version may still be group/world readable
        restrict_permissions(&self.path)?;
        debug!("Wrote key store {}", self.path.display());
        Ok(())
    }
}

/// Open for writing; a newly created file is owner-only from the start.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), InsightError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), InsightError> {
    Ok(())
}

impl CredentialProvider for KeyStore {
    fn api_key(&self) -> Result<Option<String>, InsightError> {
        Ok(non_blank(self.get(API_KEY_NAME)?))
    }
}

/// Reads the key from `OPENAI_API_KEY`.
#[derive(Debug, Clone, Default)]
pub struct EnvCredential;

impl CredentialProvider for EnvCredential {
    fn api_key(&self) -> Result<Option<String>, InsightError> {
        Ok(non_blank(std::env::var(API_KEY_ENV).ok()))
    }
}

/// A fixed key, e.g. from a command-line flag.
#[derive(Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticCredential(***)")
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Result<Option<String>, InsightError> {
        Ok(non_blank(Some(self.0.clone())))
    }
}

/// Tries providers in order and returns the first key found.
#[derive(Default)]
pub struct ChainedCredentials {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl CredentialProvider for ChainedCredentials {
    fn api_key(&self) -> Result<Option<String>, InsightError> {
        for provider in &self.providers {
            if let Some(key) = provider.api_key()? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}
