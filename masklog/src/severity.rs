//! Log severities and their cascading order.

use std::{fmt, str::FromStr};

use crate::error::ConfigError;

/// Ordered log severity.
///
/// A record written at a severity is also written to every sink of a lower
/// severity, so the `FATAL` sink only holds fatal records while the `INFO` sink
/// holds everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Single character used at the start of every header.
    pub const fn letter(self) -> char {
        match self {
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
            Severity::Fatal => 'F',
        }
    }

    /// Upper-case name, as used in file names and bridge configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Parses one of `INFO`, `WARNING`, `ERROR` or `FATAL`.
    ///
    /// Anything else is a static misconfiguration and is reported as
    /// [`ConfigError::UnknownSeverity`].
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.name() == name)
            .ok_or_else(|| ConfigError::UnknownSeverity(name.to_string()))
    }

    /// Severities that receive a record written at `self`, highest first.
    pub(crate) fn cascade(self) -> impl Iterator<Item = Severity> {
        Self::ALL[..=self.index()].iter().rev().copied()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
