//! Error types for sqlbind

use thiserror::Error;

/// Result type alias for sqlbind operations
pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error types surfaced by fragment execution, row scanning, and value codecs
#[derive(Debug, Error)]
pub enum Error {
    /// Failure bubbled unchanged from the database driver
    #[error("{0}")]
    Driver(BoxError),

    /// A value of the wrong kind was handed to a scan destination
    #[error("expected {expected}, got {got}")]
    Mismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// An integer value does not fit the destination type
    #[error("integer {value} out of range for {ty}")]
    OutOfRange { value: i128, ty: &'static str },

    /// Encoding a statement argument failed
    #[error("failed to encode argument: {0}")]
    Encode(#[source] BoxError),

    /// Decoding a column value failed
    #[error("failed to decode column: {0}")]
    Decode(#[source] BoxError),

    /// No record field matched the column name
    #[error("field {0:?} not found")]
    FieldNotFound(String),

    /// Two result columns resolved to the same record field
    #[error("field {0:?} bound more than once")]
    FieldReused(String),

    /// The destination count differs from the column count
    #[error("expected {columns} destinations, got {dests}")]
    ColumnCount { columns: usize, dests: usize },

    /// The per-row scan callback failed
    #[error("failed to scan rows: {0}")]
    Scan(#[source] Box<Error>),

    /// Releasing the cursor failed
    #[error("failed to close rows: {0}")]
    Close(#[source] Box<Error>),

    /// An earlier failure followed by a close failure; neither is dropped
    #[error("{0}; {1}")]
    Join(Box<Error>, #[source] Box<Error>),
}

impl Error {
    /// Wrap a driver error
    pub fn driver(err: impl Into<BoxError>) -> Self {
        Self::Driver(err.into())
    }

    /// Create an argument-encoding error
    pub fn encode(err: impl Into<BoxError>) -> Self {
        Self::Encode(err.into())
    }

    /// Create a column-decoding error
    pub fn decode(err: impl Into<BoxError>) -> Self {
        Self::Decode(err.into())
    }

    /// Join an earlier error with a close failure so that both are surfaced
    pub(crate) fn join(self, close: Error) -> Self {
        Self::Join(Box::new(self), Box::new(close))
    }
}
