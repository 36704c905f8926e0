use thiserror::Error;

use crate::http::HttpError;

/// Failure of a call against the users REST resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server could not be reached or the body could not be read.
    #[error("Request failed: {0}")]
    Transport(String),
    /// Non-2xx answer. The body is not inspected.
    #[error("API returned status: {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
