//! Password hashing and verification.
//!
//! New hashes are salted Argon2id in PHC string format. Verification also
//! recognises bcrypt hashes so credentials issued before the algorithm
//! migration keep working; malformed hashes verify as non-matches instead
//! of erroring.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

fn salt() -> SaltString {
    use rand::Rng;
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).expect("16 bytes fit in a salt string")
}

/// Hash a plaintext password with a fresh random salt.
///
/// Hashing the same plaintext twice yields different strings; equality is
/// only meaningful through [`verify`].
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt())
        .map(|h| h.to_string())
}

/// Check a plaintext password against a stored hash.
///
/// Tries each recognised format in turn: Argon2 PHC strings, then bcrypt
/// (`$2a$` / `$2b$` / `$2y$`). Unrecognised or corrupt hashes are treated
/// as a non-match.
pub fn verify(password: &str, hashed: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hashed) {
        return Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
    }
    if hashed.starts_with("$2") {
        return bcrypt::verify(password, hashed).unwrap_or(false);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_are_salted() {
        let first = hash("secret123").expect("hashing succeeds");
        let second = hash("secret123").expect("hashing succeeds");
        assert_ne!(first, second);
        assert!(verify("secret123", &first));
        assert!(verify("secret123", &second));
    }

    #[rstest]
    fn rejects_wrong_password() {
        let hashed = hash("secret123").expect("hashing succeeds");
        assert!(!verify("wrongpass", &hashed));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-hash")]
    #[case("$argon2id$v=19$broken")]
    #[case("$2b$truncated")]
    fn malformed_hashes_never_match(#[case] hashed: &str) {
        assert!(!verify("secret123", hashed));
    }

    #[rstest]
    fn verifies_legacy_bcrypt_hashes() {
        let hashed = bcrypt::hash("secret123", 4).expect("bcrypt hashing succeeds");
        assert!(verify("secret123", &hashed));
        assert!(!verify("wrongpass", &hashed));
    }
}
