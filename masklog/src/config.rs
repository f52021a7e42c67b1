//! Plain logger settings.
//!
//! Everything here is data: it can be built in code with the `with_*`
//! methods or, with the `serde` feature, deserialized from a config file.
//! Collaborators such as the clock or the sink factory are injected through
//! [`crate::LoggerBuilder`] instead.

use std::path::PathBuf;

use crate::{redaction::DEFAULT_DEPTH_LIMIT, rotation::RotationPolicy, severity::Severity};

/// Logger settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerConfig {
    /// Program name used as the first component of log file names. Defaults
    /// to the executable's file name.
    pub program: Option<String>,
    /// Host name placed after the program in log file names, shortened to
    /// its first label. Left out of the name when unset.
    pub host: Option<String>,
    /// Directory for log files. Defaults to the system temp directory.
    pub log_dir: Option<PathBuf>,
    pub rotation: RotationPolicy,
    /// Global verbosity level for `v(level)` calls.
    pub verbosity: i32,
    /// Per-file overrides, `glob=level[,glob=level...]`.
    pub vmodule: String,
    /// Maximum rendered line length in characters; negative disables
    /// truncation.
    pub max_message_len: i64,
    /// `file:line` of a call site whose records get a backtrace attached.
    pub trace_location: Option<String>,
    /// Mirror every record to stderr.
    pub also_to_stderr: bool,
    /// Records at or above this severity are mirrored to stderr.
    pub stderr_threshold: Severity,
    /// Nesting depth at which redaction stops descending.
    pub depth_limit: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            program: None,
            host: None,
            log_dir: None,
            rotation: RotationPolicy::default(),
            verbosity: 0,
            vmodule: String::new(),
            max_message_len: -1,
            trace_location: None,
            also_to_stderr: false,
            stderr_threshold: Severity::Error,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    #[must_use]
    pub const fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_vmodule(mut self, vmodule: impl Into<String>) -> Self {
        self.vmodule = vmodule.into();
        self
    }

    #[must_use]
    pub const fn with_max_message_len(mut self, max_message_len: i64) -> Self {
        self.max_message_len = max_message_len;
        self
    }

    #[must_use]
    pub fn with_trace_location(mut self, location: impl Into<String>) -> Self {
        self.trace_location = Some(location.into());
        self
    }

    #[must_use]
    pub const fn with_also_to_stderr(mut self, also_to_stderr: bool) -> Self {
        self.also_to_stderr = also_to_stderr;
        self
    }

    #[must_use]
    pub const fn with_stderr_threshold(mut self, threshold: Severity) -> Self {
        self.stderr_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }
}
