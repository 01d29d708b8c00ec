//! Client error types.

use thiserror::Error;

use civiquiz_core::error::{LoadError, SubmissionError};

/// Errors raised by the JSON request wrapper.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with a non-success status.
    #[error("HTTP error! status: {status} - {body}")]
    Status { status: u16, body: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// A caller-supplied header name or value is not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl RequestError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<RequestError> for LoadError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Decode(msg) => LoadError::Malformed(msg),
            other => LoadError::Unavailable(other.to_string()),
        }
    }
}

impl From<RequestError> for SubmissionError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Status { status, body } => SubmissionError::Rejected { status, body },
            RequestError::Decode(msg) => SubmissionError::Decode(msg),
            other => SubmissionError::Network(other.to_string()),
        }
    }
}

/// Errors from the chat assistant.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Blank questions are not sent.
    #[error("question is empty")]
    EmptyQuestion,

    #[error(transparent)]
    Request(#[from] RequestError),
}
