// Password hashing and verification

use crate::auth::error::AuthError;

/// bcrypt cost; fixed, not configurable at runtime
pub const PASSWORD_WORK_FACTOR: u32 = 10;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a fresh random salt.
    ///
    /// The salt and cost are embedded in the returned string, so nothing else
    /// needs to be stored alongside it.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, PASSWORD_WORK_FACTOR)
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))
    }

    /// Verify a password against a stored hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash).map_err(|e| AuthError::PasswordHashError(e.to_string()))
    }

    /// Hash on the blocking pool so request workers are not stalled
    pub async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))?
    }

    /// Verify on the blocking pool
    pub async fn verify_password_blocking(
        password: String,
        hash: String,
    ) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = PasswordService::hash_password("s3cret-pass").unwrap();
        assert!(PasswordService::verify_password("s3cret-pass", &hash).unwrap());
        assert!(!PasswordService::verify_password("wrong-pass", &hash).unwrap());
    }

    #[test]
    fn test_hash_embeds_salt_and_cost() {
        let first = PasswordService::hash_password("same-input").unwrap();
        let second = PasswordService::hash_password("same-input").unwrap();

        // Random salt: same plaintext, different output
        assert_ne!(first, second);
        assert!(first.starts_with("$2"));
        assert!(first.contains("$10$"));
        assert_ne!(first, "same-input");
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = PasswordService::verify_password("anything", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::PasswordHashError(_))));
    }

    #[tokio::test]
    async fn test_blocking_variants_agree() {
        let hash = PasswordService::hash_password_blocking("pa55word".to_string())
            .await
            .unwrap();
        assert!(PasswordService::verify_password_blocking("pa55word".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!PasswordService::verify_password_blocking("pa55wort".to_string(), hash)
            .await
            .unwrap());
    }

    proptest! {
        // bcrypt is slow on purpose; keep the case count small
        #![proptest_config(ProptestConfig::with_cases(4))]

        #[test]
        fn prop_hash_verifies_only_its_password(password in "[a-zA-Z0-9!@#]{1,40}") {
            let hash = PasswordService::hash_password(&password)?;
            prop_assert!(PasswordService::verify_password(&password, &hash)?);
            let altered = format!("{}x", password);
            prop_assert!(!PasswordService::verify_password(&altered, &hash)?);
        }
    }
}
