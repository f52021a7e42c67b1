//! Adapters for emitting redacted values through `slog`.
//!
//! Values are rendered by the redaction engine and handed to `slog` as a
//! single string, so the unredacted value never reaches a drain. Types that
//! derive `Sensitive` also implement `slog::Value` directly when this feature
//! is on.

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::redaction::{redact, Redact, Tag};

/// A `slog::Value` holding an already redacted rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedactedText {
    text: String,
}

impl RedactedText {
    /// Redacts `value` under `tag`.
    pub fn new<T: Redact + ?Sized>(value: &T, tag: Option<Tag>) -> Self {
        Self {
            text: redact(value, tag),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl SlogValue for RedactedText {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, &self.text)
    }
}

/// Converts values into a `slog::Value` that logs their redacted rendering.
///
/// ## Example
/// ```ignore
/// use masklog::slog::IntoRedactedText;
///
/// info!(logger, "payment"; "request" => request.redacted());
/// info!(logger, "contact"; "mobile" => mobile.redacted_as(Tag::PhoneNumber));
/// ```
pub trait IntoRedactedText: Redact {
    fn redacted(&self) -> RedactedText {
        RedactedText::new(self, None)
    }

    /// Redacts `self` as if it were a field classified with `tag`.
    fn redacted_as(&self, tag: Tag) -> RedactedText {
        RedactedText::new(self, Some(tag))
    }
}

impl<T> IntoRedactedText for T where T: Redact + ?Sized {}
