//! Test: Tagging a scalar field should fail.
//!
//! Masking rules only apply to strings; numbers are always logged as is.

use masklog::Sensitive;

#[derive(Sensitive)]
struct Account {
    // ERROR: numbers are never masked
    #[sensitive(CardNumber)]
    number: u64,
}

fn main() {}
