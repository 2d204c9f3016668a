use thiserror::Error;

/// Failure talking to the remote metadata API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("HTTP error! status: {status} ({endpoint})")]
    Status { status: u16, endpoint: String },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("TMDB API key is not configured")]
    MissingApiKey,
}

impl TransportError {
    pub fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else if err.is_decode() {
            Self::Decode {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Failure reading or writing the local key-value store. Never fatal: callers
/// log it and carry on as if nothing was stored.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Gave up after {skips} consecutive empty pages (last page {page})")]
    SkipLimitExceeded { page: u32, skips: u32 },
}

/// An address that does not name any view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No view at {0}")]
    NotFound(String),

    #[error("Invalid id '{0}'")]
    InvalidId(String),
}
