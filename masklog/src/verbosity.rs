//! Per-source-file verbosity overrides (`vmodule`).
//!
//! The gate holds a global level and an ordered list of `glob=level`
//! overrides. A leveled call at `level` from short file `f` is enabled when the
//! first pattern matching `f` allows it, or, with no matching pattern, when
//! the global level does.

use std::{
    path::Path,
    sync::{PoisonError, RwLock},
};

use glob::Pattern;

use crate::error::VerbosityError;

/// Verbosity level of a leveled call.
pub type Level = i32;

#[derive(Debug, Clone)]
struct ModulePattern {
    pattern: Pattern,
    level: Level,
}

#[derive(Debug, Default)]
struct VerbosityState {
    global: Level,
    patterns: Vec<ModulePattern>,
}

/// Runtime-adjustable verbosity table.
#[derive(Debug, Default)]
pub struct VerbosityGate {
    state: RwLock<VerbosityState>,
}

impl VerbosityGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_global(&self, level: Level) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .global = level;
    }

    pub fn global(&self) -> Level {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .global
    }

    /// Replaces the override table with `spec`, a comma-separated list of
    /// `glob=level` entries.
    ///
    /// The whole update is rejected, and the current table kept, if any entry
    /// is malformed. An empty `spec` clears the table.
    pub fn set_patterns(&self, spec: &str) -> Result<(), VerbosityError> {
        let patterns = parse_patterns(spec)?;
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .patterns = patterns;
        Ok(())
    }

    /// Whether a call at `level` from `short_file` should be logged.
    pub fn enabled(&self, level: Level, short_file: &str) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .patterns
            .iter()
            .find(|entry| entry.pattern.matches(short_file))
            .map_or(level <= state.global, |entry| level <= entry.level)
    }
}

fn parse_patterns(spec: &str) -> Result<Vec<ModulePattern>, VerbosityError> {
    let mut patterns = Vec::new();
    for entry in spec.split(',').map(str::trim) {
        if entry.is_empty() {
            continue;
        }
        let Some((glob, level)) = entry.split_once('=') else {
            return Err(VerbosityError::Syntax {
                entry: entry.to_string(),
            });
        };
        let (glob, level) = (glob.trim(), level.trim());
        if glob.is_empty() || level.is_empty() {
            return Err(VerbosityError::Syntax {
                entry: entry.to_string(),
            });
        }
        let level: Level = level.parse().map_err(|source| VerbosityError::Level {
            entry: entry.to_string(),
            source,
        })?;
        let pattern = Pattern::new(glob).map_err(|source| VerbosityError::Pattern {
            pattern: glob.to_string(),
            source,
        })?;
        // A zero override cannot enable anything beyond the default.
        if level == 0 {
            continue;
        }
        patterns.push(ModulePattern { pattern, level });
    }
    Ok(patterns)
}

/// The file name of `path` without directories or extension.
pub fn short_file_name(path: &str) -> &str {
    let path = Path::new(path);
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
}
