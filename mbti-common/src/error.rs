//! Common error types for the quiz service

use serde::Serialize;
use thiserror::Error;

/// Common result type for quiz service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the HTTP service
#[derive(Error, Debug)]
pub enum Error {
    /// Storage layer failure (wraps sqlx::Error). Never retried.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found, or owned by someone else
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed input supplied by the caller
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness violation (duplicate username or email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A single stored record could not be decoded
    #[error("Decode error: {0}")]
    Decode(DecodeError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A stored test result whose columns could not be decoded.
///
/// Carries the raw column text so the record can still be surfaced to the
/// owner instead of failing the whole listing.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("result {id}: {reason}")]
pub struct DecodeError {
    pub id: String,
    #[serde(rename = "result_type")]
    pub raw_type: String,
    #[serde(rename = "score")]
    pub raw_tallies: String,
    pub created_at: String,
    #[serde(rename = "decode_error")]
    pub reason: String,
}
