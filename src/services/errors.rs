use http::StatusCode;
use thiserror::Error;

/// Failure taxonomy shared by the GitHub and Render REST clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("authentication rejected")]
    Unauthorized,
    #[error("api responded with status {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("invalid api response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Maps a non-success response to `Unauthorized` or `Api`, lifting the
/// upstream `message` field out of the body when one is present.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }

    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|err| err.message)
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| "api request failed".to_string());
    let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    ApiError::Api { status, message }
}
