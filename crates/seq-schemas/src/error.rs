use thiserror::Error;

/// Closed error taxonomy surfaced to callers of the core operations.
///
/// Transport adapters (`seq-daemon`) match on the variant to choose a
/// status code; nothing downstream of the core should need to inspect
/// the message string.
#[derive(Debug, Error)]
pub enum SeqError {
    #[error("unknown prefix: {0}")]
    UnknownPrefix(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unsafe reset: requested value {requested} does not exceed current value {current}")]
    UnsafeReset { current: i64, requested: i64 },

    #[error("transient failure: {0}")]
    Transient(String),
}

impl SeqError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// `true` for error kinds a caller can reasonably retry without
    /// changing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SeqError::Transient(_))
    }
}

impl From<sqlx::Error> for SeqError {
    fn from(e: sqlx::Error) -> Self {
        SeqError::Transient(format!("store error: {e}"))
    }
}

impl From<redis::RedisError> for SeqError {
    fn from(e: redis::RedisError) -> Self {
        SeqError::Transient(format!("counter store error: {e}"))
    }
}

impl From<tokio::time::error::Elapsed> for SeqError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        SeqError::Transient("operation timed out".to_string())
    }
}

pub type SeqResult<T> = Result<T, SeqError>;
