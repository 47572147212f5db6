// src/errors.rs

use std::fmt;

/// Errors raised while loading or validating element descriptors.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog document is not valid JSON for a list of elements.
    Parse(serde_json::Error),
    /// The element service could not be reached or answered with an error status.
    Http(String),
    /// A descriptor parsed but carries values the simulation cannot use.
    InvalidElement { atomic_number: u32, reason: String },
    /// No usable element survived validation.
    Empty,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "Failed to parse element catalog: {}", e),
            CatalogError::Http(msg) => write!(f, "Element service request failed: {}", msg),
            CatalogError::InvalidElement {
                atomic_number,
                reason,
            } => write!(f, "Element #{} is invalid: {}", atomic_number, reason),
            CatalogError::Empty => write!(f, "Element catalog contains no usable elements"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Http(e.to_string())
    }
}

/// Contract violations on the simulation session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The session was never activated with an element.
    Uninitialized,
    /// The session's element was deselected or replaced.
    Disposed,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Uninitialized => {
                write!(f, "Cannot step a session that has no element yet")
            }
            SessionError::Disposed => write!(f, "Cannot step a disposed session"),
        }
    }
}

impl std::error::Error for SessionError {}
