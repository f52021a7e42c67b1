//! Test: A tag outside the fixed set should fail with the list of valid tags.

use masklog::Sensitive;

#[derive(Sensitive)]
struct Traveller {
    // ERROR: there is no `Passport` tag
    #[sensitive(Passport)]
    passport: String,
}

fn main() {}
