//! Employee identifier generation.
//!
//! Identifiers are derived from the employee's name, birth date, and
//! position together with the creation instant, hashed with SHA-256 and
//! truncated to 8 hex characters. Including the creation instant makes the
//! id best-effort unique rather than guaranteed: two records collide only
//! when every input, including the nanosecond timestamp, is identical.

use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Global counter for deterministic ID generation in tests.
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Whether to use deterministic IDs (for testing).
static USE_DETERMINISTIC_IDS: AtomicBool = AtomicBool::new(false);

/// Enable deterministic ID generation for testing.
///
/// When enabled, the creation instant is replaced by a counter so ids are
/// reproducible across runs.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(true, Ordering::SeqCst);
    TEST_COUNTER.store(0, Ordering::SeqCst);
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(false, Ordering::SeqCst);
}

/// The creation instant fed into the hash, in nanoseconds.
fn creation_instant() -> u64 {
    if USE_DETERMINISTIC_IDS.load(Ordering::SeqCst) {
        TEST_COUNTER.fetch_add(1, Ordering::SeqCst)
    } else {
        // Truncation is fine - we only need entropy, not precision
        #[allow(clippy::cast_possible_truncation)]
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64)
    }
}

/// Generate an 8-character employee id.
///
/// The id is the first 8 hex characters of a SHA-256 digest over the
/// employee's full name, birth date, position, and the creation instant.
#[must_use]
pub fn generate_employee_id(full_name: &str, birth_date: &str, position: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(full_name.as_bytes());
    hasher.update(birth_date.as_bytes());
    hasher.update(position.as_bytes());
    hasher.update(creation_instant().to_le_bytes());
    let digest = hasher.finalize();

    format!("{:02x}{:02x}{:02x}{:02x}", digest[0], digest[1], digest[2], digest[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_id_is_8_hex_chars() {
        enable_deterministic_ids();

        let id = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_deterministic_ids_are_reproducible() {
        enable_deterministic_ids();
        let first = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");

        enable_deterministic_ids();
        let second = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");

        assert_eq!(first, second);
        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_deterministic_ids_differ_per_call() {
        enable_deterministic_ids();

        let first = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");
        let second = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");
        assert_ne!(first, second);

        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_different_inputs_give_different_ids() {
        enable_deterministic_ids();

        let a = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");
        enable_deterministic_ids();
        let b = generate_employee_id("Bob Weber", "1990-04-12", "Accountant");

        assert_ne!(a, b);
        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_random_ids_differ() {
        disable_deterministic_ids();

        let a = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");
        let b = generate_employee_id("Alice Schmidt", "1990-04-12", "Accountant");
        // Nanosecond instants differ between the two calls.
        assert_ne!(a, b);
    }
}
