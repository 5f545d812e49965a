// JWT token generation and validation service

use crate::auth::{error::AuthError, models::Role};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session tokens expire 8 hours after issuance
pub const TOKEN_LIFETIME_SECS: i64 = 8 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub role: Role,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Token service for JWT operations.
///
/// Built once at startup from the configured secret and shared read-only
/// between requests.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in verify_at against an explicit clock
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: TOKEN_LIFETIME_SECS,
        }
    }

    /// Issue a token for the given identity, valid from now
    pub fn issue(&self, user_id: i32, role: Role) -> Result<String, AuthError> {
        self.issue_at(user_id, role, Utc::now().timestamp())
    }

    /// Issue a token as if it were created at `issued_at` (unix seconds)
    pub fn issue_at(&self, user_id: i32, role: Role, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id,
            role,
            iat: issued_at,
            exp: issued_at + self.lifetime,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Validate a token as of `now` (unix seconds).
    ///
    /// Signature and structure are checked first; a token is expired once
    /// `now` reaches its `exp` claim.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)?;

        if now >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes")
    }

    #[test]
    fn test_token_lifetime_is_8_hours() {
        let service = test_token_service();
        let token = service.issue(1, Role::Member).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn test_token_accepted_after_one_minute() {
        let service = test_token_service();
        let issued_at = 1_700_000_000;
        let token = service.issue_at(7, Role::Member, issued_at).unwrap();

        let claims = service.verify_at(&token, issued_at + 60).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Member);
    }

    #[test]
    fn test_token_rejected_after_lifetime() {
        let service = test_token_service();
        let issued_at = 1_700_000_000;
        let token = service.issue_at(7, Role::Member, issued_at).unwrap();

        let result = service.verify_at(&token, issued_at + TOKEN_LIFETIME_SECS + 60);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));

        // Boundary: exp itself is already expired
        let result = service.verify_at(&token, issued_at + TOKEN_LIFETIME_SECS);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_claims_carry_identity_and_role() {
        let service = test_token_service();
        let token = service.issue(0, Role::Admin).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, 0);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        for token in [
            "",
            "not.a.token",
            "invalid_token_format",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
        ] {
            assert!(matches!(service.verify(token), Err(AuthError::InvalidToken)));
        }
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1");
        let service2 = TokenService::new("secret2");

        let token = service1.issue(1, Role::Member).unwrap();

        assert!(service1.verify(&token).is_ok());
        assert!(matches!(service2.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = test_token_service();
        let token = service.issue(5, Role::Member).unwrap();
        let admin_token = service.issue(5, Role::Admin).unwrap();

        // Splice the admin payload onto the member signature
        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert!(matches!(service.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_unknown_role_claim_is_invalid() {
        #[derive(Serialize)]
        struct RawClaims {
            sub: i32,
            role: &'static str,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let raw = RawClaims { sub: 1, role: "root", iat: now, exp: now + 60 };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &raw,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        let result = test_token_service().verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    proptest! {
        #[test]
        fn prop_claims_survive_issue_and_verify(
            user_id in 0i32..1_000_000,
            admin in any::<bool>(),
        ) {
            let service = test_token_service();
            let role = if admin { Role::Admin } else { Role::Member };

            let token = service.issue(user_id, role)?;
            let claims = service.verify(&token)?;
            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.role, role);
            prop_assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);
        }

        #[test]
        fn prop_valid_until_expiry(
            elapsed in 0i64..TOKEN_LIFETIME_SECS,
        ) {
            let service = test_token_service();
            let issued_at = 1_700_000_000;
            let token = service.issue_at(3, Role::Member, issued_at)?;
            prop_assert!(service.verify_at(&token, issued_at + elapsed).is_ok());
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.verify(&malformed).is_err());
        }
    }
}
