use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store: backend failure: {0}")]
    Backend(String),

    #[error("store: codec failure: {0}")]
    Codec(String),
}

impl StoreError {
    #[inline]
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into())
    }

    #[inline]
    pub fn codec(message: impl Into<String>) -> Self {
        StoreError::Codec(message.into())
    }
}
