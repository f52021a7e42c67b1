//! Test: Flattening a field that is not a derived named struct should fail.

use masklog::Sensitive;

#[derive(Sensitive)]
struct Envelope {
    // ERROR: `String` has no fields to flatten
    #[sensitive(flatten)]
    body: String,
}

fn main() {}
