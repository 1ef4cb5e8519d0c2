//! Wiring of stores, the REST client and repositories from config

use tracing::debug;

use fleetdesk_infra::{StrapiClient, StrapiResourceRepository, StrapiVehicleRepository};
use fleetdesk_store::{ReadStateStore, SessionStore};
use fleetdesk_types::{Error, Result};

use crate::config::Config;

/// Open the login session store
pub fn open_session_store(config: &Config) -> Result<SessionStore> {
    let state_dir = config.state_dir()?;
    SessionStore::open(state_dir)
}

/// Open the notification read-state store
pub fn open_read_state_store(config: &Config) -> Result<ReadStateStore> {
    let state_dir = config.state_dir()?;
    ReadStateStore::open(state_dir)
}

/// Client without credentials, used for logging in
pub fn open_anonymous_client(config: &Config) -> Result<StrapiClient> {
    config.validate()?;
    Ok(StrapiClient::new(
        &config.api_base_url,
        config.request_timeout(),
    )?)
}

/// Client carrying the stored bearer token.
///
/// Fails with [`Error::Unauthenticated`] when no session exists for the
/// configured backend.
pub fn open_client(config: &Config) -> Result<StrapiClient> {
    let sessions = open_session_store(config)?;
    let session = sessions
        .current()
        .filter(|s| s.matches_api(&config.api_base_url))
        .ok_or(Error::Unauthenticated)?;
    debug!(user = %session.user.username, "Using stored session");
    Ok(open_anonymous_client(config)?.with_token(session.jwt.clone()))
}

/// Vehicle repository for reminder and idle use cases
pub fn open_vehicle_repo(config: &Config) -> Result<StrapiVehicleRepository> {
    Ok(StrapiVehicleRepository::new(
        open_client(config)?,
        config.fetch_page_size,
    ))
}

/// Generic CRUD repository
pub fn open_resource_repo(config: &Config) -> Result<StrapiResourceRepository> {
    Ok(StrapiResourceRepository::new(open_client(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fleetdesk_store::{AuthSession, SessionUser};
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            state_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_client_requires_session() {
        let dir = tempdir().unwrap();
        let err = open_client(&config_in(dir.path())).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn test_open_client_ignores_session_for_other_backend() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let mut sessions = open_session_store(&config).unwrap();
        sessions
            .save(AuthSession {
                jwt: "t".to_string(),
                user: SessionUser {
                    id: 1,
                    username: "ops".to_string(),
                    email: String::new(),
                },
                api_base_url: "https://other.example.com".to_string(),
                logged_in_at: Utc::now(),
            })
            .unwrap();

        assert!(matches!(open_client(&config), Err(Error::Unauthenticated)));

        let mut matching = sessions.current().unwrap().clone();
        matching.api_base_url = config.api_base_url.clone();
        sessions.save(matching).unwrap();
        assert!(open_client(&config).unwrap().has_token());
    }
}
