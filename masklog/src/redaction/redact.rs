//! The traversal contract and its entrypoints.
//!
//! Every type that can appear in a log argument implements [`Redact`]: std
//! types through the impls in this crate, user types through
//! `#[derive(Sensitive)]`. An implementation never decides *whether* something
//! is sensitive; it reports its shape to the [`Walker`] and forwards the active
//! tag to its children.

use super::{Fields, Tag, Walker};

/// A value that can be rendered with sensitive strings masked.
///
/// `tag` is the classification inherited from the enclosing field, if any.
/// Containers forward it unchanged to their elements; strings apply it; records
/// reset it for their own fields.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be rendered with redaction",
    label = "this type does not implement `Redact`",
    note = "use `#[derive(Sensitive)]` on the type definition",
    note = "or log a `Value` built from it"
)]
pub trait Redact {
    /// Reports this value's shape to `walker`.
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>);

    /// The raw text of string-like values.
    ///
    /// Used to classify map values by key name and to scan untagged string
    /// fields for `key=value` pairs.
    fn as_text(&self) -> Option<&str> {
        None
    }
}

/// The fields of a named struct, walkable into another struct's field list.
///
/// Generated by the derive for named structs so they can be embedded with
/// `#[sensitive(flatten)]`.
#[doc(hidden)]
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be flattened",
    label = "`#[sensitive(flatten)]` needs a named struct deriving `Sensitive`"
)]
pub trait RedactFields {
    fn walk_fields(&self, fields: &mut Fields<'_>);
}

/// Renders `value` with every tagged string masked.
///
/// `tag` applies to the top-level value as if it were a field carrying that
/// classification; pass `None` for ordinary log arguments.
#[must_use]
pub fn redact<T>(value: &T, tag: Option<Tag>) -> String
where
    T: Redact + ?Sized,
{
    let mut walker = Walker::new();
    value.walk(&mut walker, tag);
    walker.finish()
}

/// Like [`redact`], with an explicit nesting limit.
#[must_use]
pub fn redact_with_limit<T>(value: &T, tag: Option<Tag>, depth_limit: usize) -> String
where
    T: Redact + ?Sized,
{
    let mut walker = Walker::with_depth_limit(depth_limit);
    value.walk(&mut walker, tag);
    walker.finish()
}
