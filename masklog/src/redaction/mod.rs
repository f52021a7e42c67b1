//! Tag-driven redaction of log arguments.
//!
//! - **`tag`** / **`rules`**: what kind of sensitive data a string is, and how
//!   that kind is masked.
//! - **`redact`** / **`walker`**: the traversal contract and its per-call
//!   context.
//! - **`impls`** / **`value`**: shapes of std types and of schemaless values.
//! - **`scan`**: partial redaction of untagged `key=value` text.

mod impls;
mod redact;
pub(crate) mod rules;
mod scan;
mod tag;
mod value;
mod walker;

pub use impls::{BORROWED_PLACEHOLDER, LOCKED_PLACEHOLDER};
pub use redact::{redact, redact_with_limit, Redact, RedactFields};
pub use rules::{KeepConfig, EMAIL_MASK};
pub use scan::{classify_key, scan_pairs};
pub use tag::Tag;
pub use value::Value;
pub use walker::{
    Fields, Order, Walker, CYCLE_PLACEHOLDER, DEFAULT_DEPTH_LIMIT, DEPTH_PLACEHOLDER,
};

/// The masking rules, one function per [`Tag`].
pub mod mask {
    pub use super::rules::{
        alipay_account, card_number, email, identity_card, phone_number, real_name,
    };
}
