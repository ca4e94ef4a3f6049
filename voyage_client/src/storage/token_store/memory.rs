use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::config::AUTH_TOKEN_KEY;
use crate::storage::errors::StorageError;

use super::types::{InMemoryTokenStore, TokenStore};

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::with_key(AUTH_TOKEN_KEY.as_str())
    }

    pub fn with_key(key: &str) -> Self {
        tracing::info!("Creating new in-memory token store");
        Self {
            key: key.to_string(),
            entry: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn get(&self) -> Result<Option<String>, StorageError> {
        Ok(self.entry.read().await.get(&self.key).cloned())
    }

    async fn set(&self, token: &str) -> Result<(), StorageError> {
        self.entry
            .write()
            .await
            .insert(self.key.clone(), token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.entry.write().await.remove(&self.key);
        Ok(())
    }
}
