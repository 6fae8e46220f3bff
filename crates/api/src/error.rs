use std::path::PathBuf;

use thiserror::Error;

/// Every failure a management API call can surface.
///
/// `Transport`, `Status` and `Decode` are produced by the network round-trip.
/// The remaining variants fire before anything is sent.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout or an aborted body read.
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The broker answered with a status outside 200-299.
    #[error("Management API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response carried a body that is not valid JSON.
    #[error("Invalid JSON in response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Unable to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `.` and `..` would be folded away by URL parsing.
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Unable to load CA bundle {}: {message}", .path.display())]
    CaBundle { path: PathBuf, message: String },
}

impl ApiError {
    /// HTTP status of a `Status` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of a `Status` failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// True when the per-call timeout elapsed. The broker may or may not have
    /// applied the request.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(err) if err.is_timeout())
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::Status { status: 401, .. } => {
                Some("Verify the username and password for the management user")
            }
            ApiError::Status { status: 403, .. } => {
                Some("The user needs the 'management' or 'administrator' tag")
            }
            ApiError::Status { status: 404, .. } => {
                Some("Check the resource name and that the vhost is percent-encoded")
            }
            ApiError::Transport(err) if err.is_timeout() => {
                Some("The request timed out; inspect broker state before retrying")
            }
            ApiError::Transport(err) if err.is_connect() => {
                Some("Check that the management plugin is enabled and reachable")
            }
            ApiError::CaBundle { .. } => Some("The CA bundle must be a PEM encoded file"),
            ApiError::InvalidPathSegment(_) => {
                Some("Resources named '.' or '..' cannot be addressed over HTTP")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
