//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// A stored value that is not a valid bcrypt hash (e.g. the OAuth2
/// sentinel) reads as a non-match rather than an error, so callers can
/// treat every mismatch uniformly as invalid credentials.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    match bcrypt::verify(password, hash) {
        Ok(ok) => Ok(ok),
        Err(bcrypt::BcryptError::InvalidHash(_)) => Ok(false),
        Err(e) => Err(AuthError::Internal(format!("bcrypt verify: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::OAUTH2_PASSWORD_SENTINEL;

    #[test]
    fn hash_then_verify_succeeds() {
        let hash = hash_password("pw123456").unwrap();
        assert!(verify_password("pw123456", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn sentinel_never_verifies() {
        assert!(!verify_password("OAUTH2_USER", OAUTH2_PASSWORD_SENTINEL).unwrap());
        assert!(!verify_password("anything", OAUTH2_PASSWORD_SENTINEL).unwrap());
    }
}
