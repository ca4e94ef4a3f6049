mod config;
mod file;
mod memory;
mod types;

pub use config::token_store_from_env;
pub use types::{FileTokenStore, InMemoryTokenStore, TokenStore};
