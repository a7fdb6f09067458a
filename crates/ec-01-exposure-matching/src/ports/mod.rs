//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports (outbound) - Observation log and diagnosis key sources

pub mod inbound;
pub mod outbound;

pub use inbound::MatchingApi;
pub use outbound::{DiagnosisKeyProvider, ObservationLogProvider};
