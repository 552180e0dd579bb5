use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use rand_core::RngCore;
use subtle::ConstantTimeEq;

use super::errors::OAuthError;
use crate::store::settings::Settings;

/// Oldest pending tokens are evicted past this backlog, so an abandoned
/// login attempt cannot grow the stored list without bound.
const MAX_PENDING_STATES: usize = 16;

pub(crate) fn generate_state_token() -> String {
    let mut bytes = [0u8; 32]; // 256-bit token
    rand_core::OsRng.fill_bytes(&mut bytes);
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Issues a fresh anti-forgery token and records it as pending.
pub(crate) async fn issue(settings: &Settings) -> Result<String, OAuthError> {
    let token = generate_state_token();
    let mut pending = settings.pending_oauth_states().await?;
    pending.push(token.clone());
    if pending.len() > MAX_PENDING_STATES {
        let excess = pending.len() - MAX_PENDING_STATES;
        pending.drain(..excess);
    }
    settings.set_pending_oauth_states(&pending).await?;
    Ok(token)
}

/// Validates a presented token against the pending list and removes it.
/// Each issued token verifies at most once; a replay fails.
pub(crate) async fn consume(settings: &Settings, presented: &str) -> Result<(), OAuthError> {
    let mut pending = settings.pending_oauth_states().await?;

    // Scan the whole list so timing does not reveal the match position.
    let mut matched = None;
    for (index, candidate) in pending.iter().enumerate() {
        if bool::from(candidate.as_bytes().ct_eq(presented.as_bytes())) {
            matched = Some(index);
        }
    }

    match matched {
        Some(index) => {
            pending.remove(index);
            settings.set_pending_oauth_states(&pending).await?;
            Ok(())
        }
        None => Err(OAuthError::InvalidState),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::memory::MemoryCredentialStore;

    fn settings() -> Settings {
        Settings::new(Arc::new(MemoryCredentialStore::new()))
    }

    #[tokio::test]
    async fn issued_tokens_are_unique() {
        let settings = settings();
        let first = issue(&settings).await.unwrap();
        let second = issue(&settings).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn token_verifies_exactly_once() {
        let settings = settings();
        let token = issue(&settings).await.unwrap();

        consume(&settings, &token).await.unwrap();

        let replay = consume(&settings, &token).await;
        assert!(matches!(replay, Err(OAuthError::InvalidState)));
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let settings = settings();
        let _issued = issue(&settings).await.unwrap();

        let forged = generate_state_token();
        let result = consume(&settings, &forged).await;
        assert!(matches!(result, Err(OAuthError::InvalidState)));
    }

    #[tokio::test]
    async fn backlog_is_bounded() {
        let settings = settings();
        let oldest = issue(&settings).await.unwrap();
        for _ in 0..MAX_PENDING_STATES {
            issue(&settings).await.unwrap();
        }

        let pending = settings.pending_oauth_states().await.unwrap();
        assert_eq!(pending.len(), MAX_PENDING_STATES);
        assert!(matches!(
            consume(&settings, &oldest).await,
            Err(OAuthError::InvalidState)
        ));
    }
}
