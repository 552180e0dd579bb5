use async_trait::async_trait;

use super::models::Repository;
use crate::services::errors::ApiError;

#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Lists the authenticated user's repositories. One page of up to 100;
    /// accounts past that see a truncated list (documented scale limit).
    async fn list_repositories(&self, token: &str) -> Result<Vec<Repository>, ApiError>;
}
