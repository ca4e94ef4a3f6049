use async_trait::async_trait;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::config::AUTH_TOKEN_KEY;
use crate::storage::errors::StorageError;

use super::types::{FileTokenStore, TokenStore};

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, AUTH_TOKEN_KEY.as_str())
    }

    pub fn with_key(path: impl Into<PathBuf>, key: &str) -> Self {
        let path = path.into();
        tracing::info!("Creating file token store at {}", path.display());
        Self {
            key: key.to_string(),
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Map<String, Value>, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(StorageError::Serde(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    /// Entries to rewrite on `set`/`clear`, and whether the file was unreadable. An
    /// unreadable file is replaced instead of blocking every later sign-in or eviction.
    async fn entries_for_update(&self) -> Result<(Map<String, Value>, bool), StorageError> {
        match self.read_entries().await {
            Ok(entries) => Ok((entries, false)),
            Err(StorageError::Serde(e)) => {
                tracing::warn!(
                    "Replacing unreadable token file {}: {}",
                    self.path.display(),
                    e
                );
                Ok((Map::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Write to a sibling temp file, then rename it over the target so readers never
    /// see a partially written file.
    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(entries)?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, contents).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("token_store"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn init(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        match self.read_entries().await {
            Ok(_) => Ok(()),
            // Reads as "no token"; the next set or clear replaces the file
            Err(StorageError::Serde(e)) => {
                tracing::warn!("Token file {} is unreadable: {}", self.path.display(), e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn get(&self) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        let entries = self.read_entries().await?;
        match entries.get(&self.key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(token)) => Ok(Some(token.clone())),
            Some(other) => Err(StorageError::Serde(format!(
                "Expected a string under '{}', found {other}",
                self.key
            ))),
        }
    }

    async fn set(&self, token: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let (mut entries, _) = self.entries_for_update().await?;
        entries.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_entries(&entries).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let (mut entries, unreadable) = self.entries_for_update().await?;
        if entries.remove(&self.key).is_none() && !unreadable {
            return Ok(());
        }
        self.write_entries(&entries).await
    }
}
