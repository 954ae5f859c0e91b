//! Error types for antispam-client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` already carries the server's
    /// `detail` when it sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The HTTP status for API errors, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
