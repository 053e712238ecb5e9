//! Common error types for RP Portal components.

use thiserror::Error;

/// Common errors that can occur across RP Portal components
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Token storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias using `CommonError`
pub type Result<T> = std::result::Result<T, CommonError>;
