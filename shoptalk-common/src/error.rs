//! Error types for Shoptalk services.

use thiserror::Error;

/// Result type alias using the Shoptalk error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Shoptalk services.
///
/// Backend failures are not represented here: the remote model capability
/// carries its own typed error, which the resolver absorbs into the fallback
/// path rather than propagating to callers.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if this is an input validation error.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Get HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }
}
