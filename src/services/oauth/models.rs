use serde::Deserialize;

/// Query parameters GitHub appends to the redirect back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Opaque token issued by GitHub. No expiry is tracked; OAuth-app tokens
/// are long-lived and either present or absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}
