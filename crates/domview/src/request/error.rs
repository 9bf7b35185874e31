use std::fmt;

use super::response::{BodyKind, RawResponse};

/// Errors that can occur while performing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The server answered with a non-success status.
    Status(RawResponse),

    /// The request never produced a response.
    Network { url: String, message: String },

    /// The body could not be decoded as the content type announced.
    Decode {
        url: String,
        kind: BodyKind,
        message: String,
    },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Status(response) => {
                write!(f, "{} responded with status {}", response.url, response.status)
            }
            RequestError::Network { url, message } => {
                write!(f, "Request to {} failed: {}", url, message)
            }
            RequestError::Decode { url, kind, message } => {
                write!(
                    f,
                    "Failed to decode {} body from {}: {}",
                    kind.name(),
                    url,
                    message
                )
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Result type alias for requests.
pub type RequestResult<T> = Result<T, RequestError>;
