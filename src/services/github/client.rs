use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::models::Repository;
use super::service::GitHubApi;
use crate::services::errors::{status_error, ApiError};

pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "render-bridge";
const REPOS_PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    #[cfg(test)]
    base_url_override: Option<String>,
}

impl GitHubClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            #[cfg(test)]
            base_url_override: None,
        }
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .unwrap_or(GITHUB_API_BASE_URL)
    }

    #[cfg(not(test))]
    fn base_url(&self) -> &str {
        GITHUB_API_BASE_URL
    }

    #[cfg(test)]
    pub(crate) fn set_base_url_override(&mut self, base_url: impl Into<String>) {
        self.base_url_override = Some(base_url.into());
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn list_repositories(&self, token: &str) -> Result<Vec<Repository>, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::MissingCredential("github access token"));
        }

        let url = format!(
            "{}/user/repos?per_page={}",
            self.base_url().trim_end_matches('/'),
            REPOS_PER_PAGE
        );
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("token {token}"))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("github repo listing failed with status {status}");
            return Err(status_error(status, &body));
        }

        serde_json::from_str::<Vec<Repository>>(&body)
            .map_err(|err| ApiError::MalformedResponse(err.to_string()))
    }
}
