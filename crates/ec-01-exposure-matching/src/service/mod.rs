//! Service Layer
//!
//! Contains the application services that orchestrate domain logic
//! and coordinate with external dependencies via ports.

pub mod match_engine;
pub mod matching_service;
pub mod pipeline;

pub use match_engine::{MatchEngine, MatchOutcome};
pub use matching_service::ExposureMatchingService;
pub use pipeline::MatchPipeline;
