//! Password hashing via bcrypt.

use crate::error::{CoreError, CoreResult};

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10). The random salt is embedded in the
/// returned hash.
pub fn hash_password(password: &str) -> CoreResult<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| CoreError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> CoreResult<bool> {
    bcrypt::verify(password, hash).map_err(|e| CoreError::Internal(format!("bcrypt verify: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_password() {
        let hash = hash_password("Secret123").unwrap();
        assert!(verify_password("Secret123", &hash).unwrap());
        assert!(!verify_password("secret123", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("Secret123").unwrap();
        let b = hash_password("Secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        let err = verify_password("Secret123", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
