//! Error types for the Exposure Matching subsystem

use thiserror::Error;

/// Errors that can occur in the Exposure Matching subsystem
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Diagnosis key {key_index} is malformed: {length} bytes of key material (expected 16)")]
    MalformedKey { key_index: usize, length: usize },

    #[error("Diagnosis key {key_index} has a rolling window that overflows the interval range")]
    InvalidRollingWindow { key_index: usize },

    #[error("Observation {position} is corrupt: {reason}")]
    CorruptObservation { position: usize, reason: String },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("A matching run is already in progress")]
    RunInProgress,

    #[error("Matching worker failed: {0}")]
    WorkerFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MatchingError {
    /// Attach the position of the offending key to a per-key error.
    pub fn for_key(key_index: usize, error: KeyError) -> Self {
        match error {
            KeyError::MalformedKey { length } => Self::MalformedKey { key_index, length },
            KeyError::InvalidRollingWindow { .. } => Self::InvalidRollingWindow { key_index },
        }
    }
}

/// Why a single diagnosis key could not be expanded.
///
/// Contained at key granularity: the run skips the key and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum KeyError {
    #[error("malformed key material: {length} bytes")]
    MalformedKey { length: usize },

    #[error("rolling window {start}+{period} overflows")]
    InvalidRollingWindow { start: u32, period: u32 },
}

/// Errors from observation log and diagnosis key providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Export error: {0}")]
    Export(#[from] shared_types::ExportError),
}
