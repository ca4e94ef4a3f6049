use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::{Mutex, RwLock};

use crate::storage::errors::StorageError;

/// Process-local token storage; nothing survives a restart.
pub struct InMemoryTokenStore {
    pub(super) key: String,
    pub(super) entry: RwLock<HashMap<String, String>>,
}

/// JSON-file token storage shaped like browser local storage: one object mapping
/// storage keys to string values, of which this store owns a single key.
pub struct FileTokenStore {
    pub(super) key: String,
    pub(super) path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    pub(super) lock: Mutex<()>,
}

/// Persistence medium for the bearer token.
///
/// The gateway reads the token on every request and the session store writes it on
/// sign-in and clears it on logout or eviction.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Initialize the store. This is called once before first use.
    async fn init(&self) -> Result<(), StorageError>;

    /// Read the persisted token, if any.
    async fn get(&self) -> Result<Option<String>, StorageError>;

    /// Persist a token, replacing any previous one.
    async fn set(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), StorageError>;
}
