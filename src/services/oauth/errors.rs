use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("github client id/secret are not configured")]
    MissingCredentials,
    #[error("missing state parameter")]
    MissingState,
    #[error("invalid state parameter")]
    InvalidState,
    #[error("missing code parameter")]
    MissingCode,
    #[error("token exchange request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("github error: {0}")]
    Provider(String),
    #[error("no access token received")]
    MissingToken,
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),
}
