//! Opaque identifiers handed out by the service.
//!
//! Public identifiers are UUIDs and are safe to share. The per-event edit
//! identifier is a longer alphanumeric secret; it is the only organizer
//! credential and never appears in a public response.

use rand::{distributions::Alphanumeric, Rng};
use subtle::ConstantTimeEq;
use uuid::Uuid;

const EDIT_ID_LEN: usize = 32;

pub fn new_public_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn new_edit_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(EDIT_ID_LEN)
        .map(char::from)
        .collect()
}

/// Compares a stored credential with the one a caller presented.
///
/// Runs in constant time for equal-length inputs so the comparison does not
/// leak how much of a secret was guessed correctly.
pub fn credential_matches(stored: &str, presented: &str) -> bool {
    let stored = stored.as_bytes();
    let presented = presented.as_bytes();
    stored.len() == presented.len() && stored.ct_eq(presented).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_id_never_looks_like_a_public_id() {
        let edit = new_edit_id();
        assert_eq!(edit.len(), EDIT_ID_LEN);
        assert!(edit.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(Uuid::parse_str(&edit).is_err());
    }

    #[test]
    fn credentials_compare_by_value() {
        let edit = new_edit_id();
        assert!(credential_matches(&edit, &edit.clone()));
        assert!(!credential_matches(&edit, &new_edit_id()));
        assert!(!credential_matches(&edit, &edit[..10]));
        assert!(!credential_matches(&edit, ""));
    }
}
