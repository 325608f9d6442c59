//! Logging setup for applications embedding dlnacast
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the application, which can use these helpers.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose output with source locations
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// # Environment Variables
///
/// - `DLNACAST_LOG_LEVEL`: filter directive (`info`, `dlnacast=debug`, ...)
/// - `RUST_LOG`: used when `DLNACAST_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => Registry::default()
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .with(create_env_filter("info"))
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .pretty()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(create_env_filter("debug"))
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
    }
}

/// Initialize logging from `DLNACAST_LOG_MODE`
///
/// `development` and `debug` select the matching mode; anything else is
/// silent.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = parse_mode(std::env::var("DLNACAST_LOG_MODE").ok().as_deref());
    init_logging(mode)
}

fn parse_mode(raw: Option<&str>) -> LoggingMode {
    match raw.map(str::trim) {
        Some(m) if m.eq_ignore_ascii_case("development") => LoggingMode::Development,
        Some(m) if m.eq_ignore_ascii_case("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    }
}

fn create_env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("DLNACAST_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_mode() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(Some("development")), LoggingMode::Development);
        assert_eq!(parse_mode(Some("DEBUG")), LoggingMode::Debug);
        assert_eq!(parse_mode(Some("loud")), LoggingMode::Silent);
        assert_eq!(parse_mode(None), LoggingMode::Silent);
    }
}
