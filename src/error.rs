// Error types for hubnav.
// Separates failures of the role-list fetch from general application errors.

use std::time::Duration;

use thiserror::Error;

/// Why a fetch against the hub failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not signed in or session expired")]
    Unauthorized,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    /// Short message suitable for an inline error line in the modal.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(_) => "Could not reach the server".to_string(),
            FetchError::Unauthorized => "Please sign in again".to_string(),
            FetchError::Status { status, .. } => format!("Server answered with {}", status),
            FetchError::Timeout(_) => "The server took too long to answer".to_string(),
            FetchError::Decode(_) => "The server sent an unexpected answer".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum HubError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HubError>;
