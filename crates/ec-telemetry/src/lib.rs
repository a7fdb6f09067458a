//! # EC Telemetry
//!
//! Logging setup for Exposure-Companion.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ec_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EC_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `EC_JSON_LOGS` | `false` | JSON output, on by default inside containers |
//! | `EC_CONSOLE_OUTPUT` | `true` | Write log lines to stdout |
//! | `EC_SERVICE_NAME` | `exposure-companion` | Service name in log lines |
//! | `EC_SUBSYSTEM_ID` | `00` | Subsystem identifier |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use ec_telemetry::subsystem_span;
///
/// fn run_matching() {
///     let _span = subsystem_span!("match_run", subsystem = "matching", keys = 120);
///     // ... matching logic
/// }
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
