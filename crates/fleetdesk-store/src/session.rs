//! Login session store
//!
//! Stored at: <state_dir>/session.json

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fleetdesk_types::Result;

/// User returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Bearer token plus the user it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub jwt: String,
    pub user: SessionUser,
    /// Base URL the token was issued by
    pub api_base_url: String,
    pub logged_in_at: DateTime<Utc>,
}

impl AuthSession {
    /// Whether this token was issued by the given backend
    pub fn matches_api(&self, api_base_url: &str) -> bool {
        self.api_base_url.trim_end_matches('/') == api_base_url.trim_end_matches('/')
    }
}

/// Persistent store for the current session
pub struct SessionStore {
    store_path: PathBuf,
    session: Option<AuthSession>,
}

impl SessionStore {
    /// Create or load a session store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("session.json");

        let session = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            match serde_json::from_reader(reader) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Ignoring unreadable session file {}: {}", store_path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self { store_path, session })
    }

    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// The stored session, if any
    pub fn current(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Replace the stored session
    pub fn save(&mut self, session: AuthSession) -> Result<()> {
        let file = create_private(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &session)?;
        debug!(user = %session.user.username, "Session saved");
        self.session = Some(session);
        Ok(())
    }

    /// Forget the session. Returns true if one was stored.
    pub fn clear(&mut self) -> Result<bool> {
        let existed = self.session.take().is_some() || self.store_path.exists();
        if self.store_path.exists() {
            fs::remove_file(&self.store_path)?;
        }
        Ok(existed)
    }
}

/// Truncate or create a file readable by the owner only
fn create_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
    let file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_session() -> AuthSession {
        AuthSession {
            jwt: "token-123".to_string(),
            user: SessionUser {
                id: 7,
                username: "dispatcher".to_string(),
                email: "dispatch@example.com".to_string(),
            },
            api_base_url: "http://localhost:1337".to_string(),
            logged_in_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_roundtrip_across_reopen() {
        let dir = tempdir().unwrap();
        let mut store = SessionStore::open(dir.path().to_path_buf()).unwrap();
        assert!(store.current().is_none());

        store.save(sample_session()).unwrap();

        let reopened = SessionStore::open(dir.path().to_path_buf()).unwrap();
        let session = reopened.current().unwrap();
        assert_eq!(session.jwt, "token-123");
        assert_eq!(session.user.username, "dispatcher");
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let mut store = SessionStore::open(dir.path().to_path_buf()).unwrap();
        store.save(sample_session()).unwrap();

        assert!(store.clear().unwrap());
        assert!(!store.path().exists());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_corrupted_file_is_treated_as_logged_out() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("session.json"), "{not json").unwrap();
        let store = SessionStore::open(dir.path().to_path_buf()).unwrap();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_matches_api_ignores_trailing_slash() {
        let session = sample_session();
        assert!(session.matches_api("http://localhost:1337/"));
        assert!(!session.matches_api("https://fleet.example.com"));
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = SessionStore::open(dir.path().to_path_buf()).unwrap();
        store.save(sample_session()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
