//! Error types for the docterms library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`DocTermsError`] enum. Request validation failures are classified as
//! [`ErrorCode::BadRequest`] so that callers can report them to the user
//! instead of treating them as server faults.
//!
//! # Examples
//!
//! ```
//! use docterms::error::{DocTermsError, ErrorCode, Result};
//!
//! fn validate(method: &str) -> Result<()> {
//!     Err(DocTermsError::bad_request(format!("Unknown method '{method}'")))
//! }
//!
//! let err = validate("fancy").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::BadRequest);
//! ```

use std::io;

use thiserror::Error;

/// The main error type for docterms operations.
#[derive(Error, Debug)]
pub enum DocTermsError {
    /// I/O errors (reading corpus or config files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The request was malformed: unknown field, bad method, bad value.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Schema-related errors.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Index-related errors (segment building, ordinal lookups).
    #[error("Index error: {0}")]
    Index(String),

    /// Query construction errors.
    #[error("Query error: {0}")]
    Query(String),

    /// Errors from the fst term dictionary.
    #[error("FST error: {0}")]
    Fst(#[from] fst::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for operations that may fail with DocTermsError.
pub type Result<T> = std::result::Result<T, DocTermsError>;

/// Coarse classification of an error for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The caller supplied an invalid request; retrying it will not help.
    BadRequest,
    /// Something went wrong on our side.
    ServerError,
}

impl ErrorCode {
    /// HTTP status code conventionally associated with this classification.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::ServerError => 500,
        }
    }
}

impl DocTermsError {
    /// Create a new bad request error.
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        DocTermsError::BadRequest(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        DocTermsError::Schema(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        DocTermsError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        DocTermsError::Query(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        DocTermsError::Internal(msg.into())
    }

    /// Classify this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DocTermsError::BadRequest(_) | DocTermsError::Schema(_) => ErrorCode::BadRequest,
            _ => ErrorCode::ServerError,
        }
    }

    /// Check whether this error was caused by an invalid request.
    pub fn is_bad_request(&self) -> bool {
        self.code() == ErrorCode::BadRequest
    }
}
