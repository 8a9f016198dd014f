//! Common error types used throughout the gallery catalog.
//!
//! Every catalog operation fails with one of three kinds of error: the caller
//! supplied an invalid record, the referenced record does not exist, or the
//! underlying storage failed. Only the last kind is worth retrying.

use crate::ids::ImageId;

/// Common error type for the gallery catalog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record failed field validation. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No present record has the given id.
    #[error("Image not found: {0}")]
    NotFound(ImageId),

    /// The underlying durable storage failed (I/O, locking, corruption).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input outside a record could not be interpreted (e.g. malformed hex).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new Storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the operation may succeed if resubmitted unchanged.
    ///
    /// Storage failures are transient from the caller's point of view; the
    /// catalog never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// A single field-level violation found while validating a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// A text field exceeded its declared maximum length (in characters).
    #[error("{field} is {len} characters long, maximum is {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A text field contained a NUL character.
    #[error("{field} must not contain NUL characters")]
    NulCharacter { field: &'static str },

    /// A pixel dimension was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveDimension { field: &'static str, value: i32 },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field }
            | Self::TooLong { field, .. }
            | Self::NulCharacter { field }
            | Self::NonPositiveDimension { field, .. } => *field,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
