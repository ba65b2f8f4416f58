//! Password hashing and policy checking

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AuthError;

/// Special characters accepted by the password policy
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Hash a password with argon2id and a fresh random salt
///
/// Cost parameters are the argon2 crate defaults; verification reads them
/// back from the stored PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
///
/// A mismatched password returns `Ok(false)`; only an unparsable stored
/// digest is an error.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hashed).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check a password against the registration policy
///
/// Requires length >= 8, an uppercase letter, a digit, and a special
/// character. All four conditions must hold.
pub fn meets_policy(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("TestPass123!").unwrap();

        assert!(verify_password("TestPass123!", &hash).unwrap());
        assert!(!verify_password("WrongPass123!", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("TestPass123!").unwrap();
        let second = hash_password("TestPass123!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_garbage_digest() {
        assert!(verify_password("TestPass123!", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_policy() {
        assert!(meets_policy("TestPass123!"));
        assert!(!meets_policy("weak"));
        assert!(!meets_policy("alllowercase1!"));
        assert!(!meets_policy("NoDigits!!"));
        assert!(!meets_policy("NoSpecial123"));
        assert!(!meets_policy("Sh0rt!"));
    }
}
