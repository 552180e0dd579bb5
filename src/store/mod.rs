pub mod memory;
pub mod settings;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Option keys, named after the original plugin's persisted settings.
pub mod keys {
    pub const GITHUB_CLIENT_ID: &str = "github_client_id";
    pub const GITHUB_CLIENT_SECRET: &str = "github_client_secret";
    pub const GITHUB_TOKEN: &str = "github_token";
    pub const RENDER_API_KEY: &str = "render_api_key";
    pub const SELECTED_REPOS: &str = "selected_repos";
    pub const SELECTED_RENDER_SERVICES: &str = "selected_render_services";
    pub const LAST_CREATED_SERVICE: &str = "last_created_service";
    pub const GITHUB_OAUTH_STATES: &str = "github_oauth_states";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Narrow key-value persistence contract. Implementations provide
/// single-writer-at-a-time semantics per key; no multi-key transaction
/// guarantee is assumed by callers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
