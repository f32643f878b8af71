//! Error types for request construction and body decoding.

/// Errors surfaced while building a [`Request`](crate::Request) or decoding its body.
///
/// [`NotUtf8`](RequestError::NotUtf8) and [`InvalidJson`](RequestError::InvalidJson)
/// are kept as separate variants so handlers can tell an undecodable body
/// apart from a malformed JSON payload.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The body bytes are not valid UTF-8.
    #[error("Request body is not UTF-8 encoded")]
    NotUtf8,

    /// The body is UTF-8 but not a valid JSON document.
    #[error(transparent)]
    InvalidJson(#[from] serde_json::Error),

    /// Reading the declared body from the exchange failed.
    #[error("failed to read request body: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for request operations.
pub type RequestResult<T> = Result<T, RequestError>;
