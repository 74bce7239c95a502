//! Faults reported by the remote dispatch service
//!
//! Every remote call either succeeds or fails with a [`DispatchFault`] carrying a
//! [`FaultCode`]. The engine never retries on a fault; it hands it to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable category of a remote fault
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaultCode {
    /// The addressed resource does not exist
    NotFound,
    /// The request was rejected as invalid
    Validation,
    /// Credentials were missing or wrong
    Unauthorized,
    /// Credentials lack permission for the operation
    Forbidden,
    /// The request conflicts with the current state of the resource
    Conflict,
    /// Too many requests
    RateLimited,
    /// The service failed internally
    Internal,
    /// The service could not be reached or did not answer in time
    Transport,
    /// Any other service-defined code
    #[serde(untagged)]
    Other(String),
}

impl FaultCode {
    /// Map an HTTP status code to a fault code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            s if s >= 500 => Self::Internal,
            s => Self::Other(format!("HTTP_{}", s)),
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("NOT_FOUND"),
            Self::Validation => f.write_str("VALIDATION"),
            Self::Unauthorized => f.write_str("UNAUTHORIZED"),
            Self::Forbidden => f.write_str("FORBIDDEN"),
            Self::Conflict => f.write_str("CONFLICT"),
            Self::RateLimited => f.write_str("RATE_LIMITED"),
            Self::Internal => f.write_str("INTERNAL"),
            Self::Transport => f.write_str("TRANSPORT"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// A failure signaled by the dispatch service or resource store
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct DispatchFault {
    /// Fault category
    pub code: FaultCode,

    /// Human-readable detail from the service
    #[serde(default)]
    pub message: String,
}

impl DispatchFault {
    /// Create a fault
    pub fn new(code: FaultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Shorthand for a not-found fault
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FaultCode::NotFound, message)
    }

    /// Shorthand for a transport-level failure
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Transport, message)
    }

    /// Whether this fault reports a missing resource
    pub fn is_not_found(&self) -> bool {
        self.code == FaultCode::NotFound
    }
}
