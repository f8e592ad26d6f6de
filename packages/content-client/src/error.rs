//! Error types for the generation backend client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Generation backend client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error (bad base URL, client could not be built)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, DNS failure, broken stream)
    #[error("Network error: {0}")]
    Network(String),

    /// Credential rejected by the backend (401/403)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Backend answered with a non-2xx status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Request exceeded the configured timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Response body did not match the expected envelope
    #[error("Parse error: {0}")]
    Parse(String),
}
