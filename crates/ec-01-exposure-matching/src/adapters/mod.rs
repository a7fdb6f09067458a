//! Adapters Layer (Driven Adapters)
//!
//! Contains implementations of driven ports.
//!
//! ## Adapters
//!
//! - `InMemoryObservationLog` - Serves a fixed observation log
//! - `InMemoryKeyProvider` - Serves a fixed diagnosis key list

pub mod in_memory;

pub use in_memory::{InMemoryKeyProvider, InMemoryObservationLog};
