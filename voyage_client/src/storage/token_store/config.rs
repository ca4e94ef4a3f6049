use std::sync::{Arc, LazyLock};

use crate::storage::errors::StorageError;

use super::types::{FileTokenStore, InMemoryTokenStore, TokenStore};

pub static TOKEN_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("VOYAGE_TOKEN_STORE_TYPE").unwrap_or_else(|_| "memory".to_string())
});

pub static TOKEN_STORE_PATH: LazyLock<String> = LazyLock::new(|| {
    std::env::var("VOYAGE_TOKEN_STORE_PATH").unwrap_or_else(|_| ".voyage_session.json".to_string())
});

/// Build and initialize the token store selected by `VOYAGE_TOKEN_STORE_TYPE`.
///
/// Supported types are `memory` and `file`; the file store persists to
/// `VOYAGE_TOKEN_STORE_PATH`.
pub async fn token_store_from_env() -> Result<Arc<dyn TokenStore>, StorageError> {
    let store_type = TOKEN_STORE_TYPE.as_str();
    let store_path = TOKEN_STORE_PATH.as_str();

    tracing::info!(
        "Initializing token store with type: {}, path: {}",
        store_type,
        store_path
    );

    let store = build_token_store(store_type, store_path)?;
    store.init().await?;
    Ok(store)
}

fn build_token_store(
    store_type: &str,
    store_path: &str,
) -> Result<Arc<dyn TokenStore>, StorageError> {
    match store_type {
        "memory" => Ok(Arc::new(InMemoryTokenStore::new())),
        "file" => Ok(Arc::new(FileTokenStore::new(store_path))),
        t => Err(StorageError::Config(format!(
            "Unsupported token store type: {t}. Supported types are 'memory' and 'file'"
        ))),
    }
}
