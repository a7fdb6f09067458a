//! # Exposure Matching Benchmarks
//!
//! Performance benchmarks per subsystem.

pub mod ec_01_exposure_matching;
