use std::sync::Mutex;

use async_trait::async_trait;

use super::models::Repository;
use super::service::GitHubApi;
use crate::services::errors::ApiError;

/// Canned-response implementation for wiring tests.
#[derive(Default)]
pub struct MockGitHubApi {
    pub repositories: Vec<Repository>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl GitHubApi for MockGitHubApi {
    async fn list_repositories(&self, token: &str) -> Result<Vec<Repository>, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::MissingCredential("github access token"));
        }
        self.calls
            .lock()
            .expect("mock mutex")
            .push(token.to_string());
        Ok(self.repositories.clone())
    }
}
