//! # Integration Tests
//!
//! Exercise the matching subsystem through its public API only.

pub mod concurrency;
pub mod properties;
pub mod scenarios;
