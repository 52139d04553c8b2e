//! Error types for mock HTTP objects.

use thiserror::Error;

/// Result type alias using [`MockError`].
pub type MockResult<T> = Result<T, MockError>;

/// Errors that can occur while using the mock HTTP objects.
///
/// At runtime only [`MockError::EndNotCalled`] can occur: it is returned by
/// [`MockServerResponse::body`](crate::MockServerResponse::body) when the
/// handler under test never ended the response. The remaining variants come
/// from loading request configuration or converting into `http` types.
#[derive(Debug, Error)]
pub enum MockError {
    /// The response body was read before `end()` was called.
    #[error("EndNotCalled")]
    EndNotCalled,

    /// A header name or value is not legal HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The request configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MockError {
    /// Create an invalid header error.
    pub fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader(reason.into())
    }

    /// Create a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// Returns true if this is the [`MockError::EndNotCalled`] error.
    #[must_use]
    pub fn is_end_not_called(&self) -> bool {
        matches!(self, Self::EndNotCalled)
    }
}
