//! Core error types for the trading journal.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the journal.
///
/// Persistence failures are carried by [`DatabaseError`], user input problems
/// by [`ValidationError`], unreadable images or files by [`DecodeError`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the underlying store refused a write for lack of space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Error::Database(DatabaseError::QuotaExceeded { .. }))
    }
}

/// Storage-agnostic error type for persistence operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// The write would push the store past its capacity budget.
    #[error("Storage quota exceeded: {required} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { required: u64, quota: u64 },

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input, raised before any store mutation.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("PnL value '{0}' is not a number")]
    InvalidPnl(String),

    #[error("PnL value '{0}' is out of range")]
    PnlOutOfRange(String),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

/// Errors produced while turning uploaded bytes into images or text.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unreadable image: {0}")]
    Image(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to read file: {0}")]
    Read(String),

    #[error("Malformed data URL: {0}")]
    DataUrl(String),
}

// === From implementations for common error types ===

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(format!("JSON serialization failed: {}", err))
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => DecodeError::Encode(e.to_string()),
            other => DecodeError::Image(other.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(DecodeError::from(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
