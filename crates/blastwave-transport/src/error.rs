//! Transport construction errors
//!
//! Failures of individual remote calls are reported as
//! [`DispatchFault`](blastwave_protocol::DispatchFault); this type only covers
//! setting a transport up.

use std::fmt;

/// Result type for transport construction
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while building a transport
#[derive(Debug)]
pub enum TransportError {
    /// The base URL could not be parsed
    InvalidUrl(String),

    /// A required setting was not provided
    MissingConfig(&'static str),

    /// The underlying HTTP client could not be created
    Http(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            Self::MissingConfig(field) => write!(f, "Missing required configuration: {}", field),
            Self::Http(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
