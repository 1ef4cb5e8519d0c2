//! Persistent local state for fleetdesk
//!
//! The backend owns every fleet record. Only two things live on disk here:
//! the login session and which notifications have been read.

pub mod read_state;
pub mod session;

pub use read_state::ReadStateStore;
pub use session::{AuthSession, SessionStore, SessionUser};
