//! Process-wide ULID source for new nodes and choices
//!
//! Ids generated within the same millisecond still sort in creation order,
//! so the ordered node map enumerates generated nodes oldest first.

use std::sync::{Mutex, OnceLock};
use ulid::{Generator, Ulid};

fn generator() -> &'static Mutex<Generator> {
    static GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();
    GENERATOR.get_or_init(|| Mutex::new(Generator::new()))
}

/// Generate the next id
///
/// Falls back to a plain random ULID only if the generator's random part
/// overflows within one millisecond.
pub fn next_id() -> String {
    let mut generator = generator()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    generator
        .generate()
        .unwrap_or_else(|_| Ulid::new())
        .to_string()
}
