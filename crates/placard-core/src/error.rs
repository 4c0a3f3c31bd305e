//! Error types for the Placard engine.

use std::fmt;

use serde::Serialize;

use crate::address::DeviceAddress;

/// Errors that can occur while reading, writing or localizing slot names.
///
/// Every variant is recoverable at the request boundary; callers turn
/// them into `{kind, message}` payloads via [`Error::kind`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input text does not fit the fixed slot width.
    #[error("Value too long: {len} characters, slot holds at most {max}")]
    ValueTooLong {
        /// Length of the rejected value
        len: usize,
        /// Maximum characters the slot can hold
        max: usize,
    },

    /// Slot index outside the group's `1..=slot_count` range.
    #[error("Slot index {index} out of range 1..={max}")]
    SlotIndexOutOfRange {
        /// Requested 1-based index
        index: usize,
        /// Number of slots in the group
        max: usize,
    },

    /// The register port reported a failed read.
    #[error("Register read failed at {address}: {message}")]
    RegisterReadFailed {
        /// First address of the attempted read
        address: DeviceAddress,
        /// Message reported by the port
        message: String,
    },

    /// The register port reported a failed write.
    #[error("Register write failed at {address}: {message}")]
    RegisterWriteFailed {
        /// First address of the attempted write
        address: DeviceAddress,
        /// Message reported by the port
        message: String,
    },

    /// The translation or fallback store failed.
    #[error("Persistence error: {message}")]
    PersistenceFailed {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request data is malformed (unknown field, non-ASCII text, ...).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

/// Convenience `Result` type alias for Placard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable, serializable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// See [`Error::ValueTooLong`].
    ValueTooLong,
    /// See [`Error::SlotIndexOutOfRange`].
    SlotIndexOutOfRange,
    /// See [`Error::RegisterReadFailed`].
    RegisterReadFailed,
    /// See [`Error::RegisterWriteFailed`].
    RegisterWriteFailed,
    /// See [`Error::PersistenceFailed`].
    PersistenceFailed,
    /// See [`Error::InvalidInput`].
    InvalidInput,
    /// See [`Error::Config`].
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Error {
    /// Returns the stable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ValueTooLong { .. } => ErrorKind::ValueTooLong,
            Error::SlotIndexOutOfRange { .. } => ErrorKind::SlotIndexOutOfRange,
            Error::RegisterReadFailed { .. } => ErrorKind::RegisterReadFailed,
            Error::RegisterWriteFailed { .. } => ErrorKind::RegisterWriteFailed,
            Error::PersistenceFailed { .. } => ErrorKind::PersistenceFailed,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// Returns whether the caller's request caused this error.
    ///
    /// Register and persistence failures are the controller's or the
    /// store's fault; the rest are rejected input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::ValueTooLong { .. }
                | Error::SlotIndexOutOfRange { .. }
                | Error::InvalidInput { .. }
        )
    }

    /// Creates a new persistence error with a message.
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Error::PersistenceFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new persistence error with a message and source error.
    pub fn persistence_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::PersistenceFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid-input error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Error::InvalidInput {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new invalid-input error naming the offending field.
    pub fn invalid_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::InvalidInput {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
