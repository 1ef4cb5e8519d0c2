//! Error types for fleetdesk

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Errors raised by the local JSON stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store data corrupted: {0}")]
    Corrupted(String),

    #[error("Store IO error: {0}")]
    IoError(String),
}

/// Errors talking to the REST backend
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid API url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Not logged in. Run `fleetdesk login` first")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, Error>;
