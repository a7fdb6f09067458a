//! # Exposure-Companion Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs        # Key and sighting builders
//! ├── benchmarks/        # Criterion benchmarks per subsystem
//! │   └── ec_01_exposure_matching.rs
//! │
//! └── integration/       # End-to-end behaviour
//!     ├── scenarios.rs   # Matching scenarios on the public API
//!     ├── concurrency.rs # Run slot, cancellation, events
//!     └── properties.rs  # Property-based checks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ec-tests
//!
//! # By category
//! cargo test -p ec-tests integration::scenarios
//! cargo test -p ec-tests integration::properties
//!
//! # Benchmarks
//! cargo bench -p ec-tests
//! ```

pub mod benchmarks;
pub mod fixtures;
pub mod integration;
