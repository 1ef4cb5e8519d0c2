//! Login, logout and session inspection

use chrono::Utc;
use tracing::info;

use fleetdesk_store::AuthSession;
use fleetdesk_types::{Error, Result};

use crate::config::Config;
use crate::repository::{open_anonymous_client, open_client, open_session_store};

/// Exchange credentials for a token and store the session
pub async fn login(config: &Config, identifier: &str, password: &str) -> Result<AuthSession> {
    let identifier = identifier.trim();
    if identifier.is_empty() || password.is_empty() {
        return Err(Error::InvalidInput(
            "identifier and password are required".to_string(),
        ));
    }

    let client = open_anonymous_client(config)?;
    let response = client.login(identifier, password).await?;

    let session = AuthSession {
        jwt: response.jwt,
        user: response.user,
        api_base_url: config.api_base_url.clone(),
        logged_in_at: Utc::now(),
    };
    let mut sessions = open_session_store(config)?;
    sessions.save(session.clone())?;
    info!(user = %session.user.username, "Logged in");
    Ok(session)
}

/// Forget the stored session. Returns true if there was one.
pub fn logout(config: &Config) -> Result<bool> {
    let mut sessions = open_session_store(config)?;
    sessions.clear()
}

/// The stored session; with `verify`, confirm the token with the backend.
///
/// A token the backend rejects is discarded.
pub async fn whoami(config: &Config, verify: bool) -> Result<AuthSession> {
    let sessions = open_session_store(config)?;
    let session = sessions
        .current()
        .filter(|s| s.matches_api(&config.api_base_url))
        .cloned()
        .ok_or(Error::Unauthenticated)?;

    if verify {
        match open_client(config)?.current_user().await {
            Ok(user) => return Ok(AuthSession { user, ..session }),
            Err(e) if e.is_unauthorized() => {
                logout(config)?;
                return Err(Error::Unauthenticated);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            state_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let dir = tempdir().unwrap();
        let err = login(&config_in(dir.path()), "  ", "secret").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_whoami_without_session() {
        let dir = tempdir().unwrap();
        let err = whoami(&config_in(dir.path()), false).await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn test_logout_without_session() {
        let dir = tempdir().unwrap();
        assert!(!logout(&config_in(dir.path())).unwrap());
    }
}
