//! Local preference storage.
//!
//! This module defines the contract for the small key/value store the client
//! keeps between launches (auth tokens, theme, last signed-in user). The
//! platform app may back it with its own preference API; the core ships an
//! in-memory store for tests and a JSON file store for desktop builds.
//!
//! Writes to the file store are atomic: the document is written to a
//! sibling temp file and renamed over the old one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Corrupted preference file: {0}")]
    Corrupted(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreferenceKey {
    AccessToken,
    RefreshToken,
    Theme,
    LastUserId,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::AccessToken => "access_token",
            PreferenceKey::RefreshToken => "refresh_token",
            PreferenceKey::Theme => "theme",
            PreferenceKey::LastUserId => "last_user_id",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            "system" => Some(ThemePreference::System),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Preference store contract (app implements)
// ---------------------------------------------------------------------------

/// Key/value preference storage.
///
/// Implementations must be safe to share across the REST client and the
/// view-models (`Send + Sync`, interior mutability).
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>>;

    fn set(&self, key: PreferenceKey, value: &str) -> Result<()>;

    fn remove(&self, key: PreferenceKey) -> Result<()>;

    fn access_token(&self) -> Result<Option<String>> {
        self.get(PreferenceKey::AccessToken)
    }

    fn save_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.set(PreferenceKey::AccessToken, access)?;
        self.set(PreferenceKey::RefreshToken, refresh)
    }

    /// Sign-out: forget both tokens.
    fn clear_tokens(&self) -> Result<()> {
        self.remove(PreferenceKey::AccessToken)?;
        self.remove(PreferenceKey::RefreshToken)
    }

    /// Stored theme, `System` when unset or unrecognised.
    fn theme(&self) -> Result<ThemePreference> {
        Ok(self
            .get(PreferenceKey::Theme)?
            .as_deref()
            .and_then(ThemePreference::parse)
            .unwrap_or_default())
    }

    fn set_theme(&self, theme: ThemePreference) -> Result<()> {
        self.set(PreferenceKey::Theme, theme.as_str())
    }
}

type Document = BTreeMap<String, String>;

fn lock(doc: &Mutex<Document>) -> std::sync::MutexGuard<'_, Document> {
    doc.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<Document>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>> {
        Ok(lock(&self.values).get(key.as_str()).cloned())
    }

    fn set(&self, key: PreferenceKey, value: &str) -> Result<()> {
        lock(&self.values).insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: PreferenceKey) -> Result<()> {
        lock(&self.values).remove(key.as_str());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<Document>,
}

impl FilePreferenceStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| StorageError::Corrupted(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::new(),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        log::debug!("Opened preference store at {}", path.display());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Document) -> Result<()> {
        let json =
            serde_json::to_vec_pretty(values).map_err(|e| StorageError::Io(e.to_string()))?;
        let tmp = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        std::fs::write(&tmp, json).map_err(|e| StorageError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            StorageError::Io(e.to_string())
        })
    }

    /// Apply `edit` and write the result; memory is only updated once the
    /// file write succeeded.
    fn update(&self, edit: impl FnOnce(&mut Document)) -> Result<()> {
        let mut values = lock(&self.values);
        let mut next = values.clone();
        edit(&mut next);
        if next == *values {
            return Ok(());
        }
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>> {
        Ok(lock(&self.values).get(key.as_str()).cloned())
    }

    fn set(&self, key: PreferenceKey, value: &str) -> Result<()> {
        self.update(|doc| {
            doc.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: PreferenceKey) -> Result<()> {
        self.update(|doc| {
            doc.remove(key.as_str());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_tokens() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.access_token().unwrap(), None);

        store.save_tokens("a1", "r1").unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("a1"));
        assert_eq!(
            store.get(PreferenceKey::RefreshToken).unwrap().as_deref(),
            Some("r1")
        );

        store.clear_tokens().unwrap();
        assert_eq!(store.access_token().unwrap(), None);
    }

    #[test]
    fn test_theme_defaults_to_system() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.theme().unwrap(), ThemePreference::System);

        store.set(PreferenceKey::Theme, "neon").unwrap();
        assert_eq!(store.theme().unwrap(), ThemePreference::System);

        store.set_theme(ThemePreference::Dark).unwrap();
        assert_eq!(store.theme().unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = FilePreferenceStore::open(&path).unwrap();
        store.save_tokens("a1", "r1").unwrap();
        store.set_theme(ThemePreference::Light).unwrap();
        drop(store);

        let store = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("a1"));
        assert_eq!(store.theme().unwrap(), ThemePreference::Light);

        store.remove(PreferenceKey::AccessToken).unwrap();
        let reopened = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.access_token().unwrap(), None);

        // No temp files left behind.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{oops").unwrap();
        assert!(matches!(
            FilePreferenceStore::open(&path),
            Err(StorageError::Corrupted(_))
        ));
    }
}
