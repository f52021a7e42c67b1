//! The traversal context behind every redaction call.
//!
//! A [`Walker`] owns the output buffer, the visited-pointer set and the depth
//! counter for one top-level call. `Redact` impls only ever talk to it through
//! the visitors below, one per value shape:
//!
//! | Visitor | Shape |
//! |---------|-------|
//! | [`Walker::primitive`] | numbers, booleans, `None`: verbatim, never masked |
//! | [`Walker::text`] | strings: masked when a tag is active |
//! | [`Walker::record`] / [`Walker::tuple`] / [`Walker::unit`] | structs and enum variants |
//! | [`Walker::sequence`] / [`Walker::set`] | lists, arrays, sets |
//! | [`Walker::map`] | maps: keys verbatim, values masked |
//! | [`Walker::pointer`] | shared pointers, with cycle detection |

use std::{any::type_name, collections::HashSet, fmt, fmt::Write as _, mem};

use super::{scan, Redact, RedactFields, Tag};

/// Nesting depth at which subtrees are replaced by [`DEPTH_PLACEHOLDER`].
pub const DEFAULT_DEPTH_LIMIT: usize = 32;
/// Emitted instead of re-entering a pointer that is already on the current path.
pub const CYCLE_PLACEHOLDER: &str = "<cycle>";
/// Emitted instead of a subtree nested deeper than the depth limit.
pub const DEPTH_PLACEHOLDER: &str = "<max depth>";

/// Ordering applied to map entries and set elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Keep iteration order (ordered collections).
    Iteration,
    /// Sort by rendered text (hashed collections, whose iteration order is
    /// not stable between runs).
    Sorted,
}

/// Per-call traversal state.
#[derive(Debug)]
pub struct Walker {
    out: String,
    visited: HashSet<(usize, &'static str)>,
    depth: usize,
    depth_limit: usize,
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

impl Walker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth_limit(DEFAULT_DEPTH_LIMIT)
    }

    #[must_use]
    pub fn with_depth_limit(depth_limit: usize) -> Self {
        Self {
            out: String::new(),
            visited: HashSet::new(),
            depth: 0,
            depth_limit,
        }
    }

    /// Consumes the walker and returns the rendered text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    /// Emits a terminal that is never sensitive.
    pub fn primitive(&mut self, value: impl fmt::Display) {
        // Writing into a String cannot fail.
        let _ = write!(self.out, "{value}");
    }

    /// Emits a string, masked by `tag` when one is active.
    pub fn text(&mut self, raw: &str, tag: Option<Tag>) {
        match tag {
            Some(tag) => self.out.push_str(&tag.mask(raw)),
            None => self.out.push_str(raw),
        }
    }

    /// Emits an untagged string after masking recognized `key=value` pairs.
    pub(crate) fn scanned_text(&mut self, raw: &str) {
        self.out.push_str(&scan::scan_pairs(raw));
    }

    /// Emits a struct or struct-like enum variant: `Name { a: 1, b: x }`.
    ///
    /// `inherited` is the tag active on the container; fields only pick it up
    /// when they opt in through [`Fields::inherited`].
    pub fn record(
        &mut self,
        name: &str,
        inherited: Option<Tag>,
        body: impl FnOnce(&mut Fields<'_>),
    ) {
        self.nested(|walker| {
            walker.out.push_str(name);
            let mut fields = Fields::new(walker, inherited, Layout::Named);
            body(&mut fields);
            fields.close();
        });
    }

    /// Emits a tuple struct or tuple variant: `Name(1, x)`.
    pub fn tuple(
        &mut self,
        name: &str,
        inherited: Option<Tag>,
        body: impl FnOnce(&mut Fields<'_>),
    ) {
        self.nested(|walker| {
            walker.out.push_str(name);
            let mut fields = Fields::new(walker, inherited, Layout::Positional);
            body(&mut fields);
            fields.close();
        });
    }

    /// Emits a unit struct or unit variant.
    pub fn unit(&mut self, name: &str) {
        self.out.push_str(name);
    }

    /// Emits `[a, b, ...]`, walking every element with the inherited tag.
    pub fn sequence<'v, T>(&mut self, items: impl IntoIterator<Item = &'v T>, tag: Option<Tag>)
    where
        T: Redact + ?Sized + 'v,
    {
        self.set(items, Order::Iteration, tag);
    }

    /// Like [`Walker::sequence`], optionally sorting the rendered elements.
    pub fn set<'v, T>(
        &mut self,
        items: impl IntoIterator<Item = &'v T>,
        order: Order,
        tag: Option<Tag>,
    ) where
        T: Redact + ?Sized + 'v,
    {
        self.nested(|walker| {
            let mut rendered: Vec<String> = items
                .into_iter()
                .map(|item| walker.capture(|walker| item.walk(walker, tag)))
                .collect();
            if order == Order::Sorted {
                rendered.sort();
            }
            walker.out.push('[');
            walker.out.push_str(&rendered.join(", "));
            walker.out.push(']');
        });
    }

    /// Emits `{k: v, ...}`.
    ///
    /// Keys are never masked. Values carry the inherited tag; when there is
    /// none, a key with a recognized sensitive name (`card_no`, `mobile`, ...)
    /// classifies its value.
    pub fn map<'v, K, V>(
        &mut self,
        entries: impl IntoIterator<Item = (&'v K, &'v V)>,
        order: Order,
        tag: Option<Tag>,
    ) where
        K: Redact + ?Sized + 'v,
        V: Redact + ?Sized + 'v,
    {
        self.nested(|walker| {
            let mut rendered: Vec<(String, String)> = entries
                .into_iter()
                .map(|(key, value)| {
                    let value_tag = tag.or_else(|| key.as_text().and_then(scan::classify_key));
                    let key = walker.capture(|walker| key.walk(walker, None));
                    let value = walker.capture(|walker| value.walk(walker, value_tag));
                    (key, value)
                })
                .collect();
            if order == Order::Sorted {
                rendered.sort();
            }
            walker.out.push('{');
            for (index, (key, value)) in rendered.iter().enumerate() {
                if index > 0 {
                    walker.out.push_str(", ");
                }
                walker.out.push_str(key);
                walker.out.push_str(": ");
                walker.out.push_str(value);
            }
            walker.out.push('}');
        });
    }

    /// Dereferences a shared pointer.
    ///
    /// The pointee is recorded for the duration of its own subtree; meeting
    /// it again on the same path emits [`CYCLE_PLACEHOLDER`]. Siblings that
    /// share a pointee are rendered in full.
    pub fn pointer<T: Redact + ?Sized>(&mut self, target: &T, tag: Option<Tag>) {
        let address: *const T = target;
        let identity = (address.cast::<()>() as usize, type_name::<T>());
        if !self.visited.insert(identity) {
            self.out.push_str(CYCLE_PLACEHOLDER);
            return;
        }
        self.nested(|walker| target.walk(walker, tag));
        self.visited.remove(&identity);
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self)) {
        if self.depth >= self.depth_limit {
            self.out.push_str(DEPTH_PLACEHOLDER);
            return;
        }
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    /// Renders into a scratch buffer, sharing the visited set and depth.
    fn capture(&mut self, body: impl FnOnce(&mut Self)) -> String {
        let saved = mem::take(&mut self.out);
        body(self);
        mem::replace(&mut self.out, saved)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Named,
    Positional,
}

/// Field emitter handed to struct bodies by [`Walker::record`] and
/// [`Walker::tuple`].
pub struct Fields<'w> {
    walker: &'w mut Walker,
    inherited: Option<Tag>,
    layout: Layout,
    emitted: usize,
}

impl<'w> Fields<'w> {
    fn new(walker: &'w mut Walker, inherited: Option<Tag>, layout: Layout) -> Self {
        Self {
            walker,
            inherited,
            layout,
            emitted: 0,
        }
    }

    /// The tag active on the enclosing container.
    pub fn inherited(&self) -> Option<Tag> {
        self.inherited
    }

    /// Emits a named field. Untagged string fields are scanned for
    /// `key=value` pairs.
    pub fn field<T: Redact + ?Sized>(&mut self, name: &str, value: &T, tag: Option<Tag>) {
        self.separator();
        if self.layout == Layout::Named {
            self.walker.out.push_str(name);
            self.walker.out.push_str(": ");
        }
        self.value(value, tag);
    }

    /// Emits a positional field.
    pub fn element<T: Redact + ?Sized>(&mut self, value: &T, tag: Option<Tag>) {
        self.separator();
        self.value(value, tag);
    }

    /// Emits the fields of an embedded struct as if they were declared on the
    /// enclosing one.
    pub fn flatten<T: RedactFields + ?Sized>(&mut self, value: &T) {
        value.walk_fields(self);
    }

    fn value<T: Redact + ?Sized>(&mut self, value: &T, tag: Option<Tag>) {
        match (tag, value.as_text()) {
            (None, Some(text)) => self.walker.scanned_text(text),
            _ => value.walk(self.walker, tag),
        }
    }

    fn separator(&mut self) {
        let opening = match self.layout {
            Layout::Named => " { ",
            Layout::Positional => "(",
        };
        self.walker
            .out
            .push_str(if self.emitted == 0 { opening } else { ", " });
        self.emitted += 1;
    }

    fn close(self) {
        if self.emitted == 0 {
            return;
        }
        self.walker.out.push_str(match self.layout {
            Layout::Named => " }",
            Layout::Positional => ")",
        });
    }
}
