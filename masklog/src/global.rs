//! The process-wide default logger.
//!
//! Nothing here is required: a [`Logger`] can always be built and passed
//! around explicitly. This module only adds one shared instance and free
//! functions that forward to it.

use std::sync::OnceLock;

use crate::{
    bridge::LegacyBridge,
    config::LoggerConfig,
    error::ConfigError,
    logger::{Logger, Verbose},
    redaction::Redact,
    verbosity::Level,
};

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Installs `logger` as the process-wide instance.
pub fn install(logger: Logger) -> Result<&'static Logger, ConfigError> {
    let mut slot = Some(logger);
    let installed = LOGGER.get_or_init(|| slot.take().unwrap_or_default());
    if slot.is_some() {
        return Err(ConfigError::AlreadyInitialized);
    }
    Ok(installed)
}

/// Builds a logger from `config` and installs it.
pub fn init(config: LoggerConfig) -> Result<&'static Logger, ConfigError> {
    install(Logger::new(config)?)
}

/// The process-wide instance, created with default settings on first use.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::default)
}

#[track_caller]
pub fn info<T: Redact + ?Sized>(payload: &T) {
    logger().info(payload);
}

#[track_caller]
pub fn warning<T: Redact + ?Sized>(payload: &T) {
    logger().warning(payload);
}

#[track_caller]
pub fn error<T: Redact + ?Sized>(payload: &T) {
    logger().error(payload);
}

#[track_caller]
pub fn fatal<T: Redact + ?Sized>(payload: &T) {
    logger().fatal(payload);
}

#[track_caller]
pub fn v(level: Level) -> Verbose<'static> {
    logger().v(level)
}

pub fn flush() {
    logger().flush();
}

pub fn shutdown() {
    logger().shutdown();
}

/// A bridge writing into the process-wide logger at `severity_name`.
///
/// # Panics
///
/// Panics when `severity_name` is not a severity name; a misspelled name is
/// a static mistake that must not be silently defaulted.
pub fn copy_standard_log_to(severity_name: &str) -> LegacyBridge<'static> {
    match LegacyBridge::new(logger(), severity_name) {
        Ok(bridge) => bridge,
        Err(err) => panic!("copy_standard_log_to({severity_name:?}): {err}"),
    }
}
