//! Structured logging helpers.
//!
//! Every event carries a `subsystem` field so log lines from the matcher,
//! the worker and the command-line driver can be filtered apart.

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    // Info level with subsystem
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Warn level with subsystem
    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Error level with subsystem
    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Debug level with subsystem
    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a matching-run event with standard fields.
#[macro_export]
macro_rules! log_run_event {
    ($level:ident, $subsystem:expr, $msg:expr, $run_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            run_id = %$run_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a diagnosis-key event with standard fields.
#[macro_export]
macro_rules! log_key_event {
    ($level:ident, $subsystem:expr, $msg:expr, $key_index:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            key_index = $key_index,
            $($($field)*,)?
            $msg
        )
    };
}
