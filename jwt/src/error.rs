//! JWT error types

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Token text does not follow the compact serialization rules
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    /// Identifier is not a JWT signing algorithm
    #[error("No such algorithm: {0}")]
    UnknownAlgorithm(String),
    /// Identifier is a JWT algorithm that has no implementation here
    #[error("Not implemented: {0}")]
    NotImplemented(String),
    /// Key material cannot be used with the requested algorithm
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// The cryptographic provider failed
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),
    /// Header or claims could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse category of a [`JwtError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JwtErrorKind {
    /// See [`JwtError::MalformedToken`]
    MalformedToken,
    /// See [`JwtError::UnknownAlgorithm`]
    UnknownAlgorithm,
    /// See [`JwtError::NotImplemented`]
    NotImplemented,
    /// See [`JwtError::InvalidKey`]
    InvalidKey,
    /// See [`JwtError::Crypto`]
    Crypto,
    /// See [`JwtError::Serialization`]
    Serialization,
}

impl JwtError {
    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create an unknown algorithm error
    #[inline]
    #[must_use]
    pub fn unknown_algorithm(alg: &str) -> Self {
        JwtError::UnknownAlgorithm(alg.to_string())
    }

    /// Create a not implemented error
    #[inline]
    #[must_use]
    pub fn not_implemented(msg: &str) -> Self {
        JwtError::NotImplemented(msg.to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Create a cryptographic provider error
    #[inline]
    #[must_use]
    pub fn crypto(msg: &str) -> Self {
        JwtError::Crypto(msg.to_string())
    }

    /// Category of this error
    #[must_use]
    pub fn kind(&self) -> JwtErrorKind {
        match self {
            JwtError::MalformedToken(_) => JwtErrorKind::MalformedToken,
            JwtError::UnknownAlgorithm(_) => JwtErrorKind::UnknownAlgorithm,
            JwtError::NotImplemented(_) => JwtErrorKind::NotImplemented,
            JwtError::InvalidKey(_) => JwtErrorKind::InvalidKey,
            JwtError::Crypto(_) => JwtErrorKind::Crypto,
            JwtError::Serialization(_) => JwtErrorKind::Serialization,
        }
    }
}
