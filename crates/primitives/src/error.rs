//! Error types for primitive parsing.

use thiserror::Error;

/// Errors raised while constructing primitive values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Input had the wrong number of bytes.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// Input was not a valid hex string.
    #[error("Invalid hex: {message}")]
    InvalidHex {
        /// Error message.
        message: String,
    },

    /// Public key bytes are not a compressed curve point encoding.
    #[error("Invalid public key: {message}")]
    InvalidPublicKey {
        /// Error message.
        message: String,
    },
}

impl PrimitiveError {
    /// Create an invalid length error.
    pub fn invalid_length(expected: usize, actual: usize) -> Self {
        Self::InvalidLength { expected, actual }
    }

    /// Create an invalid hex error.
    pub fn invalid_hex<S: Into<String>>(message: S) -> Self {
        Self::InvalidHex {
            message: message.into(),
        }
    }

    /// Create an invalid public key error.
    pub fn invalid_public_key<S: Into<String>>(message: S) -> Self {
        Self::InvalidPublicKey {
            message: message.into(),
        }
    }
}

/// Result type for primitive operations.
pub type PrimitiveResult<T> = std::result::Result<T, PrimitiveError>;
