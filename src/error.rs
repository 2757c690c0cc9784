//! Error types for shpcursor library

use std::io;
use thiserror::Error;

/// Main error type for shapefile reading operations
#[derive(Debug, Error)]
pub enum ShapeError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The stream is not a shapefile this reader understands (bad file code or version)
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The byte source ended before a fixed-size field or record payload was complete
    #[error("Truncated input: needed {expected} bytes for {context}")]
    Truncated {
        /// Number of bytes the read required
        expected: usize,
        /// What was being read when the source ran out
        context: &'static str,
    },

    /// A record envelope declared a content length that cannot fit in the file
    #[error("Invalid length {length} words for record {record} ({remaining} bytes left in file)")]
    InvalidRecordLength {
        /// Record number from the envelope
        record: i32,
        /// Content length from the envelope, in 16-bit words
        length: i32,
        /// Bytes remaining before the declared end of file
        remaining: i64,
    },

    /// The payload decoder rejected a record's bytes
    #[error("Payload decode error: {0}")]
    PayloadDecode(String),
}

impl ShapeError {
    /// Whether this error was caused by a short read.
    pub fn is_truncated(&self) -> bool {
        matches!(self, ShapeError::Truncated { .. })
    }

    /// Whether this error was raised while validating the file header.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, ShapeError::UnsupportedFormat(_))
    }
}

/// Result type alias for shpcursor operations
pub type Result<T> = std::result::Result<T, ShapeError>;
