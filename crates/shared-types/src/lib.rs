//! # Shared Types Crate
//!
//! Value types exchanged between the Exposure-Companion crates.
//!
//! ## Design Principles
//!
//! - **Immutable facts**: `DiagnosisKey` and `Observation` are constructed once
//!   and only read afterwards.
//! - **Fixed-width identifiers**: rolling identifiers and encrypted metadata are
//!   fixed-size arrays, so length checks happen once at the boundary.
//! - **Explicit unknowns**: optional report metadata is modelled as enums with an
//!   `Unknown` variant rather than absent fields.

pub mod entities;
pub mod errors;
pub mod export;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use export::{split_export_header, EXPORT_HEADER};
pub use time::*;
