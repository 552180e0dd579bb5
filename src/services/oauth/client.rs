use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{info, warn};

use super::errors::OAuthError;
use super::models::{AccessToken, CallbackQuery};
use super::state_token;
use crate::store::settings::Settings;

pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const OAUTH_SCOPE: &str = "repo";

#[cfg(test)]
#[derive(Default)]
struct EndpointOverrides {
    token_url: Option<String>,
}

/// Drives the GitHub authorization-code flow: authorize URL out, callback
/// in, code-for-token exchange server-side. The connection lifecycle lives
/// entirely in the injected settings store.
pub struct GitHubOAuthClient {
    client: Client,
    settings: Settings,
    redirect_uri: String,
    #[cfg(test)]
    endpoint_overrides: EndpointOverrides,
}

impl GitHubOAuthClient {
    pub fn new(client: Client, settings: Settings, redirect_uri: impl Into<String>) -> Self {
        Self {
            client,
            settings,
            redirect_uri: redirect_uri.into(),
            #[cfg(test)]
            endpoint_overrides: EndpointOverrides::default(),
        }
    }

    #[cfg(test)]
    fn token_url(&self) -> &str {
        self.endpoint_overrides
            .token_url
            .as_deref()
            .unwrap_or(GITHUB_TOKEN_URL)
    }

    #[cfg(not(test))]
    fn token_url(&self) -> &str {
        GITHUB_TOKEN_URL
    }

    #[cfg(test)]
    pub(crate) fn set_token_url_override(&mut self, token_url: impl Into<String>) {
        self.endpoint_overrides.token_url = Some(token_url.into());
    }

    /// Builds the authorize redirect and issues the anti-forgery state
    /// bound to it. Returns `(url, state)`.
    pub async fn authorize_url(&self) -> Result<(String, String), OAuthError> {
        let credentials = self
            .settings
            .github_credentials()
            .await?
            .ok_or(OAuthError::MissingCredentials)?;

        let state = state_token::issue(&self.settings).await?;

        let mut url = Url::parse(GITHUB_AUTHORIZE_URL).expect("valid github authorize url");
        url.query_pairs_mut()
            .append_pair("client_id", &credentials.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("state", &state);

        Ok((url.into(), state))
    }

    /// Validates the redirect back from GitHub and exchanges the code for
    /// an access token. The state check gates everything else, including
    /// error passthrough, so a forged callback learns nothing.
    pub async fn handle_callback(&self, query: &CallbackQuery) -> Result<AccessToken, OAuthError> {
        let credentials = self
            .settings
            .github_credentials()
            .await?
            .ok_or(OAuthError::MissingCredentials)?;

        let state = query
            .state
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(OAuthError::MissingState)?;
        state_token::consume(&self.settings, state).await?;

        if let Some(message) = query
            .error_description
            .clone()
            .or_else(|| query.error.clone())
        {
            warn!("github callback carried an error: {message}");
            return Err(OAuthError::Provider(message));
        }

        let code = query
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(OAuthError::MissingCode)?;

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: Option<String>,
            error: Option<String>,
            error_description: Option<String>,
        }

        let response = self
            .client
            .post(self.token_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ])
            .send()
            .await?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|_| OAuthError::MissingToken)?;

        if let Some(error) = body.error {
            let message = body.error_description.unwrap_or(error);
            warn!("github token exchange rejected: {message}");
            return Err(OAuthError::Provider(message));
        }

        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingToken)?;

        self.settings.set_access_token(&token).await?;
        info!("github account connected");

        Ok(AccessToken {
            access_token: token,
        })
    }

    /// Discards the stored token. The token is not revoked at GitHub;
    /// OAuth-app tokens stay valid until revoked in the app settings.
    pub async fn logout(&self) -> Result<(), OAuthError> {
        self.settings.clear_access_token().await?;
        info!("github account disconnected");
        Ok(())
    }

    pub async fn connected(&self) -> Result<bool, OAuthError> {
        Ok(self.settings.access_token().await?.is_some())
    }
}
