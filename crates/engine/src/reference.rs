//! Public complaint reference codes.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Prefix of every reference code.
pub const REFERENCE_PREFIX: &str = "CMP";

/// Generate `CMP-YYYYMMDDHHMMSS-NNNN` for the given instant.
///
/// Unique in practice but not guaranteed under concurrent submissions in the
/// same second; callers retry on collision.
pub fn generate_reference_code(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!(
        "{}-{}-{:04}",
        REFERENCE_PREFIX,
        now.format("%Y%m%d%H%M%S"),
        suffix
    )
}

/// Check that a string has the reference code shape.
pub fn is_reference_code(code: &str) -> bool {
    let parts: Vec<&str> = code.split('-').collect();
    match parts.as_slice() {
        [prefix, timestamp, suffix] => {
            *prefix == REFERENCE_PREFIX
                && timestamp.len() == 14
                && timestamp.bytes().all(|b| b.is_ascii_digit())
                && suffix.len() == 4
                && suffix.bytes().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}
