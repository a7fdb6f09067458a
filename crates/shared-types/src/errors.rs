//! # Error Types
//!
//! Defines error types used across crates.

use thiserror::Error;

/// Errors converting external data into shared value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// A fixed-width field had the wrong length.
    #[error("Invalid {field} length: expected {expected}, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A numeric field is outside its representable range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

/// Errors related to the diagnosis key export container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The container is shorter than its header.
    #[error("Export too short: {len} bytes")]
    Truncated { len: usize },

    /// The container does not start with the expected header.
    #[error("Invalid header: export does not start with 'EK Export v1'")]
    InvalidHeader,
}
