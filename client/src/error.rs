//! Client error types

use authlink_jwt::JwtError;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Server answered 401
    #[error("Unauthorized")]
    Unauthorized,
    /// Server answered with a status other than 2xx or 401
    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
    /// Request could not be delivered
    #[error("Transport error: {0}")]
    Transport(String),
    /// Login succeeded without an `authctoken` member
    #[error("Login response carried no token")]
    MissingToken,
    /// Response body was not what the endpoint promises
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
    /// Token store I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Stored token could not be parsed or verified
    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),
}
