//! Error types for the HTTP acceptor adapter

use paxos_application::GatewayError;
use thiserror::Error;

/// Result type alias for HTTP adapter operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// Errors that can occur when talking to an acceptor over HTTP
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid acceptor URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Acceptor answered with status {0}")]
    Status(u16),

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },
}

impl From<HttpError> for GatewayError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Request(e) if e.is_timeout() => GatewayError::Timeout,
            HttpError::Request(e) => GatewayError::ConnectionError(e.to_string()),
            HttpError::Status(code) => GatewayError::Status(code),
            HttpError::ParseError { error, .. } => GatewayError::MalformedResponse(error),
            other => GatewayError::Other(other.to_string()),
        }
    }
}
