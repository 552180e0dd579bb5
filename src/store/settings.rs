use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::json;

use super::{keys, CredentialStore, StoreError};
use crate::services::render::models::CreatedService;

/// GitHub OAuth app identity, entered once by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubAppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Typed facade over the raw key-value store. Every persisted setting the
/// integration uses goes through here; callers never touch option keys
/// directly.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn CredentialStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.store.get(key).await?;
        Ok(value
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty()))
    }

    async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        match self.store.get(key).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Present only when both halves are non-empty.
    pub async fn github_credentials(&self) -> Result<Option<GitHubAppCredentials>, StoreError> {
        let client_id = self.get_string(keys::GITHUB_CLIENT_ID).await?;
        let client_secret = self.get_string(keys::GITHUB_CLIENT_SECRET).await?;
        Ok(match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(GitHubAppCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        })
    }

    pub async fn set_github_credentials(
        &self,
        credentials: &GitHubAppCredentials,
    ) -> Result<(), StoreError> {
        self.store
            .put(keys::GITHUB_CLIENT_ID, json!(credentials.client_id))
            .await?;
        self.store
            .put(keys::GITHUB_CLIENT_SECRET, json!(credentials.client_secret))
            .await
    }

    pub async fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.get_string(keys::GITHUB_TOKEN).await
    }

    pub async fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.put(keys::GITHUB_TOKEN, json!(token)).await
    }

    pub async fn clear_access_token(&self) -> Result<(), StoreError> {
        self.store.delete(keys::GITHUB_TOKEN).await
    }

    pub async fn render_api_key(&self) -> Result<Option<String>, StoreError> {
        self.get_string(keys::RENDER_API_KEY).await
    }

    pub async fn set_render_api_key(&self, api_key: &str) -> Result<(), StoreError> {
        self.store.put(keys::RENDER_API_KEY, json!(api_key)).await
    }

    /// Selected repository full names (`owner/name`).
    pub async fn selected_repos(&self) -> Result<BTreeSet<String>, StoreError> {
        self.get_string_set(keys::SELECTED_REPOS).await
    }

    pub async fn set_selected_repos(&self, repos: &BTreeSet<String>) -> Result<(), StoreError> {
        self.store
            .put(keys::SELECTED_REPOS, serde_json::to_value(repos)?)
            .await
    }

    /// Selected Render service ids.
    pub async fn selected_services(&self) -> Result<BTreeSet<String>, StoreError> {
        self.get_string_set(keys::SELECTED_RENDER_SERVICES).await
    }

    pub async fn set_selected_services(
        &self,
        service_ids: &BTreeSet<String>,
    ) -> Result<(), StoreError> {
        self.store
            .put(
                keys::SELECTED_RENDER_SERVICES,
                serde_json::to_value(service_ids)?,
            )
            .await
    }

    /// Overwritten on every creation; read once for the success notice.
    pub async fn last_created_service(&self) -> Result<Option<CreatedService>, StoreError> {
        match self.store.get(keys::LAST_CREATED_SERVICE).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set_last_created_service(
        &self,
        service: &CreatedService,
    ) -> Result<(), StoreError> {
        self.store
            .put(keys::LAST_CREATED_SERVICE, serde_json::to_value(service)?)
            .await
    }

    pub(crate) async fn pending_oauth_states(&self) -> Result<Vec<String>, StoreError> {
        match self.store.get(keys::GITHUB_OAUTH_STATES).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    pub(crate) async fn set_pending_oauth_states(
        &self,
        states: &[String],
    ) -> Result<(), StoreError> {
        self.store
            .put(keys::GITHUB_OAUTH_STATES, serde_json::to_value(states)?)
            .await
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }
}
