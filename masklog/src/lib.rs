//! Leveled logging with severity cascading, rotation and redaction.
//!
//! Two subsystems do the real work:
//!
//! - **Writing**: records go to one stream per severity and cascade to every
//!   lower one (an ERROR record also lands in the WARNING and INFO streams).
//!   Streams rotate on a size threshold or a calendar boundary. Leveled `v(n)`
//!   calls are gated by a global level plus per-file glob overrides.
//! - **Redaction**: every payload is rendered by walking its structure. Strings
//!   under a field tagged `#[sensitive(PhoneNumber)]` (or any other [`Tag`])
//!   are masked; everything else is rendered as is.
//!
//! Key rules:
//! - Tags apply to string leaves; numbers and booleans are never masked.
//! - A tag on a collection reaches every string inside it.
//! - A struct boundary resets the tag; inner fields use their own tags.
//! - Redaction never fails; unknown shapes pass through.
//!
//! What it does not do:
//! - structured (JSON) output or log shipping
//! - exhaustive PII detection
//!
//! The `Sensitive` derive macro lives in `masklog-derive` and is re-exported when
//! the `derive` feature is enabled.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[cfg(feature = "derive")]
pub use masklog_derive::Sensitive;

#[allow(unused_extern_crates)]
extern crate self as masklog;

// Module declarations
mod bridge;
mod clock;
mod config;
mod error;
pub mod global;
mod logger;
mod manager;
mod redaction;
mod rotation;
mod severity;
mod sink;
#[cfg(feature = "slog")]
pub mod slog;
mod verbosity;

// Re-exports
pub use bridge::LegacyBridge;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LoggerConfig;
pub use error::{ConfigError, SinkError, VerbosityError};
pub use logger::{
    format_header, truncate, BacktraceCapture, FatalAction, FlushDaemon, Logger, LoggerBuilder,
    StackCapture, Verbose, TRUNCATION_MARKER,
};
pub use manager::{short_hostname, stderr_observer, ErrorObserver, SinkManager};
pub use redaction::{
    classify_key, mask, redact, redact_with_limit, scan_pairs, KeepConfig, Order, Redact, Tag,
    Value, Walker, BORROWED_PLACEHOLDER, CYCLE_PLACEHOLDER, DEFAULT_DEPTH_LIMIT,
    DEPTH_PLACEHOLDER, EMAIL_MASK, LOCKED_PLACEHOLDER,
};
#[doc(hidden)]
pub use redaction::{Fields, RedactFields};
pub use rotation::{
    next_boundary, start_of_next_interval, Interval, RotationPolicy, DEFAULT_MAX_SIZE,
};
pub use severity::Severity;
pub use sink::{FileSinks, MemorySinks, Sink, SinkFactory};
pub use verbosity::{short_file_name, Level, VerbosityGate};
