//! Test: A field whose type has no `Redact` impl should fail.
//!
//! Derive `Sensitive` on the field's type, or skip the field.

use masklog::Sensitive;

struct Socket;

#[derive(Sensitive)]
struct Connection {
    // ERROR: `Socket` does not implement `Redact`
    socket: Socket,
}

fn main() {}
