//! Error types for lzws operations.
//!
//! Every failure the streaming adapters and the one-shot codec can report is a
//! variant of [`LzwsError`]. The variants are kept distinct so callers can tell
//! malformed input apart from resource exhaustion and from sequencing bugs.
//!
//! "Needs more source" and "needs more output space" are not errors; they are
//! reported through [`crate::traits::Step`] and the adapters' status values.

use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// The main error type for lzws operations.
#[derive(Debug, Error)]
pub enum LzwsError {
    /// Invalid parameter combination rejected at initialization.
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Description of the rejected parameter.
        message: String,
    },

    /// Memory for a buffer could not be reserved.
    #[error("Memory allocation failed: could not reserve {requested} bytes")]
    Allocation {
        /// Number of bytes that were requested.
        requested: usize,
    },

    /// The engine reported a result the caller did not expect.
    ///
    /// This always indicates an out-of-sequence call or an internal
    /// inconsistency and is never recoverable.
    #[error("Unexpected engine state: {message}")]
    EngineFault {
        /// Description of the unexpected state.
        message: String,
    },

    /// The decompressor received input that is not a well-formed stream.
    #[error("Decompressor received corrupted source at offset {offset}: {message}")]
    CorruptedSource {
        /// Byte offset in the compressed stream where the problem was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// A structural precondition failed before any engine processing.
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the failed precondition.
        message: String,
    },

    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for lzws operations.
pub type Result<T> = std::result::Result<T, LzwsError>;

impl LzwsError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an allocation error for a request of `requested` bytes.
    pub fn allocation(requested: usize) -> Self {
        Self::Allocation { requested }
    }

    /// Create an engine fault.
    pub fn engine_fault(message: impl Into<String>) -> Self {
        Self::EngineFault {
            message: message.into(),
        }
    }

    /// Create a corrupted source error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedSource {
            offset,
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Map a failed reservation of `requested` bytes to an allocation error.
    pub fn from_reserve(requested: usize, _source: TryReserveError) -> Self {
        Self::allocation(requested)
    }

    /// Whether this error was caused by malformed compressed input.
    pub fn is_corrupted_source(&self) -> bool {
        matches!(self, Self::CorruptedSource { .. })
    }

    /// Whether this error was caused by memory exhaustion.
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }

    /// Whether this error indicates a sequencing or internal engine problem.
    pub fn is_engine_fault(&self) -> bool {
        matches!(self, Self::EngineFault { .. })
    }
}

impl From<LzwsError> for io::Error {
    fn from(err: LzwsError) -> Self {
        match err {
            LzwsError::Io(e) => e,
            e @ (LzwsError::CorruptedSource { .. } | LzwsError::Validation { .. }) => {
                io::Error::new(io::ErrorKind::InvalidData, e)
            }
            e => io::Error::other(e),
        }
    }
}
