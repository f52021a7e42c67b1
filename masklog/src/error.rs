//! Error types.
//!
//! Redaction has no error type: every shape it does not understand is passed
//! through. The errors here cover configuration and sink I/O only.

use std::{io, num::ParseIntError};

use thiserror::Error;

use crate::severity::Severity;

/// A rejected `glob=level` verbosity update. The previous table stays active.
#[derive(Debug, Error)]
pub enum VerbosityError {
    #[error("syntax error in `{entry}`: expected a comma-separated list of pattern=N")]
    Syntax { entry: String },
    #[error("invalid level in `{entry}`")]
    Level {
        entry: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid file pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Logger configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown severity name `{0}`: expected INFO, WARNING, ERROR or FATAL")]
    UnknownSeverity(String),
    #[error("unknown rotation interval `{0}`: expected none, minute, hour, day or month")]
    UnknownInterval(String),
    #[error("invalid trace location `{0}`: expected file:line")]
    TraceLocation(String),
    #[error(transparent)]
    Verbosity(#[from] VerbosityError),
    #[error("the global logger is already initialized")]
    AlreadyInitialized,
}

impl ConfigError {
    /// Whether the error can only come from a static mistake in the program
    /// itself (a misspelled severity or interval name) rather than from
    /// runtime input. Callers are expected to abort on these.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            ConfigError::UnknownSeverity(_)
                | ConfigError::UnknownInterval(_)
                | ConfigError::AlreadyInitialized
        )
    }
}

/// Failures of the underlying streams. These are never returned to callers of
/// the logging functions; they are handed to the sink error observer.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open {severity} log `{identity}`")]
    Open {
        severity: Severity,
        identity: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {severity} log `{identity}`")]
    Write {
        severity: Severity,
        identity: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to flush {severity} log `{identity}`")]
    Flush {
        severity: Severity,
        identity: String,
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    pub fn severity(&self) -> Severity {
        match self {
            SinkError::Open { severity, .. }
            | SinkError::Write { severity, .. }
            | SinkError::Flush { severity, .. } => *severity,
        }
    }
}
