//! Credential storage behind a narrow get/set/delete interface.
//!
//! The pipeline never touches storage directly; it receives resolved keys
//! inside a [`ProviderConfig`](super::ProviderConfig). The store exists so
//! the application shell can enter, inspect, and clear keys by user action.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::RefereeResult;

/// Store id for the OpenAI key.
pub const OPENAI_KEY_ID: &str = "openai";

/// Store id for the Gemini key.
pub const GEMINI_KEY_ID: &str = "gemini";

/// Key-value credential storage keyed by provider id.
pub trait CredentialStore {
    /// Look up a credential; absence means no key is configured.
    fn get(&self, id: &str) -> Option<String>;
    /// Store or replace a credential.
    fn set(&mut self, id: &str, value: &str) -> RefereeResult<()>;
    /// Remove a credential. Returns whether one was present.
    fn delete(&mut self, id: &str) -> RefereeResult<bool>;
}

/// JSON-file-backed credential store.
pub struct FileCredentialStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileCredentialStore {
    /// Open or create a store at the given path.
    pub fn open(path: &Path) -> RefereeResult<Self> {
        let entries = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str(&data)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Open the default store at `~/.luzhanqi-referee/credentials.json`.
    pub fn default_store() -> RefereeResult<Self> {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".luzhanqi-referee")
            .join("credentials.json");
        Self::open(&path)
    }

    fn save(&self) -> RefereeResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, id: &str) -> Option<String> {
        self.entries.get(id).cloned()
    }

    fn set(&mut self, id: &str, value: &str) -> RefereeResult<()> {
        self.entries.insert(id.to_string(), value.to_string());
        self.save()
    }

    fn delete(&mut self, id: &str) -> RefereeResult<bool> {
        let removed = self.entries.remove(id).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let mut store = FileCredentialStore::open(&path).unwrap();

        store.set(OPENAI_KEY_ID, "sk-test").unwrap();
        assert_eq!(store.get(OPENAI_KEY_ID).as_deref(), Some("sk-test"));

        // Persisted across reopen.
        let reopened = FileCredentialStore::open(&path).unwrap();
        assert_eq!(reopened.get(OPENAI_KEY_ID).as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_credential_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::open(&dir.path().join("credentials.json")).unwrap();
        assert!(store.get(GEMINI_KEY_ID).is_none());
    }

    #[test]
    fn test_credential_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let mut store = FileCredentialStore::open(&path).unwrap();

        store.set(GEMINI_KEY_ID, "gm-test").unwrap();
        assert!(store.delete(GEMINI_KEY_ID).unwrap());
        assert!(store.get(GEMINI_KEY_ID).is_none());
        assert!(!store.delete(GEMINI_KEY_ID).unwrap());
    }
}
