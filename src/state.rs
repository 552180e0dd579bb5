use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::services::github::client::GitHubClient;
use crate::services::github::service::GitHubApi;
use crate::services::oauth::client::GitHubOAuthClient;
use crate::services::render::client::RenderClient;
use crate::services::render::service::RenderApi;
use crate::store::settings::Settings;
use crate::store::CredentialStore;

/// Explicit dependency bundle. Everything the integration touches is
/// constructed here and injected; there are no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub github_oauth: Arc<GitHubOAuthClient>,
    pub github: Arc<dyn GitHubApi>,
    pub render: Arc<dyn RenderApi>,
    pub http_client: Arc<Client>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn CredentialStore>) -> Self {
        let http_client = Client::new();
        let settings = Settings::new(store);
        let github_oauth = Arc::new(GitHubOAuthClient::new(
            http_client.clone(),
            settings.clone(),
            config.github_redirect_uri.clone(),
        ));

        Self {
            github: Arc::new(GitHubClient::new(http_client.clone())),
            render: Arc::new(RenderClient::new(http_client.clone())),
            http_client: Arc::new(http_client),
            github_oauth,
            settings,
            config: Arc::new(config),
        }
    }
}
