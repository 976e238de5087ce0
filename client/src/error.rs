use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failures surfaced by the API client and the data store
#[derive(Debug, Error)]
pub enum ClientError {
    /// The health check says the server is unreachable; no request was sent
    #[error("{0}")]
    Connectivity(String),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Snapshot storage failed: {0}")]
    Storage(String),
}

impl ClientError {
    /// Whether trying the same call again later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Connectivity(_) | ClientError::Transport(_))
    }

    /// HTTP status for server-side rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Decode(error.to_string())
        } else {
            ClientError::Transport(error.to_string())
        }
    }
}
