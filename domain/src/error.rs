use thiserror::Error;

/// Problems with what the user supplied. Raised before any provider call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("no document was supplied")]
    MissingDocument,
    #[error("no question was supplied")]
    MissingQuestion,
    #[error("API key must be non-empty and start with `{prefix}`")]
    InvalidCredential { prefix: String },
    #[error("unsupported file `{path}`: only .txt documents are accepted")]
    UnsupportedFile { path: String },
    #[error("file `{path}` is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { path: String, size: u64, limit: u64 },
    #[error("document is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidEncoding { offset: usize },
}

/// Failures reported by the embedding or completion provider. These are
/// propagated to the caller as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limited or out of quota: {0}")]
    RateLimited(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("request timed out")]
    Timeout,
    #[error("provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ProviderError::Authentication(message),
            429 => ProviderError::RateLimited(message),
            500..=599 => ProviderError::ServiceUnavailable(message),
            _ => ProviderError::Api { status, message },
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChunkingError {
    #[error("invalid chunking config: chunk_size={chunk_size}, overlap={overlap} (need chunk_size > 0 and overlap < chunk_size)")]
    InvalidConfig { chunk_size: usize, overlap: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("k must be greater than zero")]
    InvalidK,
}
