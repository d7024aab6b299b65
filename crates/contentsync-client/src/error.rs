//! Error types for contentsync-client

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the Delivery API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, TLS or timeout failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist
    #[error("Not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status
    #[error("{url} returned {status}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    /// The response body is not the expected JSON
    #[error("Malformed response: {message}")]
    Decode { message: String },
}

impl Error {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Every client failure is a transport failure to the sync engine.
impl From<Error> for contentsync_core::Error {
    fn from(err: Error) -> Self {
        contentsync_core::Error::transport(err.to_string())
    }
}
