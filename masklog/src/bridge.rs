//! Adapter for code that writes plain text lines.
//!
//! A [`LegacyBridge`] implements [`io::Write`]; every newline-terminated line
//! becomes one record at the configured severity. Lines that start with a
//! `file:line: ` prefix keep that location in the header, everything else is
//! attributed to `???:1`.

use std::io;

use crate::{error::ConfigError, logger::Logger, severity::Severity};

/// Location used when a line carries none.
const UNKNOWN_FILE: &str = "???";

/// Forwards written lines to a [`Logger`].
#[derive(Debug)]
pub struct LegacyBridge<'a> {
    logger: &'a Logger,
    severity: Severity,
    pending: Vec<u8>,
}

impl<'a> LegacyBridge<'a> {
    /// Creates a bridge logging at the severity called `severity_name`
    /// (`INFO`, `WARNING`, `ERROR` or `FATAL`).
    pub fn new(logger: &'a Logger, severity_name: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_severity(logger, Severity::from_name(severity_name)?))
    }

    pub fn with_severity(logger: &'a Logger, severity: Severity) -> Self {
        Self {
            logger,
            severity,
            pending: Vec::new(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    fn emit(&self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        let (file, line, text) = split_location(&text);
        self.logger.log_at(self.severity, file, line, text);
    }
}

/// Splits a leading `file:line: ` off `text`.
fn split_location(text: &str) -> (&str, u32, &str) {
    let located = text.split_once(": ").and_then(|(location, rest)| {
        let (file, line) = location.rsplit_once(':')?;
        let line = line.parse().ok()?;
        (!file.is_empty() && !file.contains(' ')).then_some((file, line, rest))
    });
    located.unwrap_or((UNKNOWN_FILE, 1, text))
}

impl io::Write for LegacyBridge<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(end) = self.pending.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            self.emit(&line[..end]);
        }
        Ok(buf.len())
    }

    /// Emits a pending partial line, then flushes the logger.
    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit(&line);
        }
        self.logger.flush();
        Ok(())
    }
}

impl Drop for LegacyBridge<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::split_location;

    #[test]
    fn locations_are_split_off() {
        assert_eq!(
            split_location("server.rs:42: listening"),
            ("server.rs", 42, "listening")
        );
        assert_eq!(split_location("plain text"), ("???", 1, "plain text"));
        assert_eq!(
            split_location("error: not a location"),
            ("???", 1, "error: not a location")
        );
        assert_eq!(
            split_location("a b:3: spaced"),
            ("???", 1, "a b:3: spaced")
        );
    }
}
