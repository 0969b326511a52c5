//! Error types for CRS normalization and CF translation.

use thiserror::Error;

/// Result type alias using CrsError.
pub type CrsResult<T> = Result<T, CrsError>;

/// Primary error type for CRS operations.
#[derive(Debug, Error)]
pub enum CrsError {
    // === Input Errors ===
    #[error("Invalid CRS input: {0}")]
    InvalidInput(String),

    #[error("CRS is empty or invalid: {0:?}")]
    Empty(String),

    #[error("Invalid PROJ string: {0}")]
    InvalidProj(String),

    #[error("Invalid WKT string: {0}")]
    InvalidWkt(String),

    // === JSON Errors ===
    #[error("CRS appears to be JSON but is not valid: {0}")]
    InvalidJson(String),

    #[error("CRS is empty JSON")]
    EmptyJson,

    // === CF Mapping Errors ===
    #[error("CF projection parameters missing '{0}'")]
    MissingKey(String),

    #[error("Unsupported grid mapping name: {0}")]
    UnsupportedGridMapping(String),

    #[error("Unsupported coordinate operation method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("{direction} parameters not mapped: {}", names.join(", "))]
    UnmappedParameters {
        direction: String,
        names: Vec<String>,
    },

    // === Engine Errors ===
    #[error("Failed to create CRS: {0}")]
    Engine(String),
}

/// Broad classification of a [`CrsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    MalformedJson,
    MissingRequiredKey,
    UnsupportedMapping,
    Engine,
}

impl CrsError {
    /// Get the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CrsError::InvalidInput(_)
            | CrsError::Empty(_)
            | CrsError::InvalidProj(_)
            | CrsError::InvalidWkt(_)
            | CrsError::InvalidParameter { .. } => ErrorCategory::InvalidInput,

            CrsError::InvalidJson(_) | CrsError::EmptyJson => ErrorCategory::MalformedJson,

            CrsError::MissingKey(_) => ErrorCategory::MissingRequiredKey,

            CrsError::UnsupportedGridMapping(_)
            | CrsError::UnsupportedMethod(_)
            | CrsError::UnmappedParameters { .. } => ErrorCategory::UnsupportedMapping,

            CrsError::Engine(_) => ErrorCategory::Engine,
        }
    }

    /// Get the process exit code used by command line tools for this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::InvalidInput => 2,
            ErrorCategory::MalformedJson => 3,
            ErrorCategory::MissingRequiredKey => 4,
            ErrorCategory::UnsupportedMapping => 5,
            ErrorCategory::Engine => 6,
        }
    }
}

impl From<serde_json::Error> for CrsError {
    fn from(err: serde_json::Error) -> Self {
        CrsError::InvalidJson(err.to_string())
    }
}
