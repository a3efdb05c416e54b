//! Token service (C3): three token families sharing one engine.
//!
//! Generalizes the teacher's single `TokenEngine`/`TokenProvider` pair to
//! the three subject claims this platform needs, rather than three
//! copy-pasted engines. Each family is a thin value carrying its claim
//! name; the engine itself is identical code for all three.

use std::sync::Arc;

use auth_cache::RevocationStore;
use auth_crypto::{JwtError, JwtService, TokenClaims, TokenType};
use chrono::{DateTime, Utc};

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFamily {
    Customer,
    Admin,
    Bot,
}

impl TokenFamily {
    pub fn subject_claim_name(&self) -> &'static str {
        match self {
            Self::Customer => "customer_id",
            Self::Admin => "admin_id",
            Self::Bot => "bot_id",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

fn map_jwt_error(err: JwtError) -> AuthError {
    match err {
        JwtError::TokenExpired => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}

/// `generateTokens`/`validateToken`/`refreshToken`/`revokeToken` for one
/// family. Construct one `TokenEngine` per family, all sharing the same
/// `JwtService` (signing key/mode is process-wide) and the same
/// `RevocationStore` (a `token_id` is unique across families, so one store
/// suffices).
pub struct TokenEngine {
    jwt: JwtService,
    revocation: Arc<dyn RevocationStore>,
    family: TokenFamily,
    rotate_refresh_tokens: bool,
}

impl TokenEngine {
    pub fn new(
        jwt: JwtService,
        revocation: Arc<dyn RevocationStore>,
        family: TokenFamily,
        rotate_refresh_tokens: bool,
    ) -> Self {
        Self {
            jwt,
            revocation,
            family,
            rotate_refresh_tokens,
        }
    }

    pub fn generate_tokens(&self, subject_id: &str) -> Result<TokenPair, AuthError> {
        let claim = self.family.subject_claim_name();
        let ((access_token, access_claims), (refresh_token, refresh_claims)) = self
            .jwt
            .issue_pair(claim, subject_id)
            .map_err(map_jwt_error)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: DateTime::from_timestamp(access_claims.expires_at, 0)
                .unwrap_or_else(Utc::now),
            refresh_expires_at: DateTime::from_timestamp(refresh_claims.expires_at, 0)
                .unwrap_or_else(Utc::now),
        })
    }

    /// Parses, verifies the signature and expiry, and consults the
    /// revocation collaborator. A token issued for a different family
    /// (missing the expected subject claim) surfaces as `TokenInvalid`,
    /// never leaking which claim was expected.
    pub async fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self
            .jwt
            .decode_and_validate(token, self.family.subject_claim_name())
            .map_err(map_jwt_error)?;

        let revoked = self
            .revocation
            .is_revoked(&claims.jti)
            .await
            .map_err(|e| AuthError::Dependency {
                message: e.to_string(),
            })?;
        if revoked {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_token(refresh_token).await?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::TokenInvalid);
        }

        if self.rotate_refresh_tokens {
            self.revocation
                .revoke(
                    &claims.jti,
                    DateTime::from_timestamp(claims.expires_at, 0).unwrap_or_else(Utc::now),
                )
                .await
                .map_err(|e| AuthError::Dependency {
                    message: e.to_string(),
                })?;
        }

        self.generate_tokens(&claims.subject_value)
    }

    pub async fn revoke_token(&self, token: &str) -> Result<(), AuthError> {
        let claims = self
            .jwt
            .decode_and_validate(token, self.family.subject_claim_name())
            .map_err(map_jwt_error)?;
        let expires_at = DateTime::from_timestamp(claims.expires_at, 0).unwrap_or_else(Utc::now);
        self.revocation
            .revoke(&claims.jti, expires_at)
            .await
            .map_err(|e| AuthError::Dependency {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_cache::InMemoryRevocationStore;
    use auth_crypto::{JwtConfig, KeyManager};

    fn engine(family: TokenFamily, rotate: bool) -> TokenEngine {
        let jwt = JwtService::new(
            JwtConfig::default(),
            KeyManager::from_hmac_secret("unit-test-secret-at-least-32-bytes-long"),
        );
        TokenEngine::new(jwt, Arc::new(InMemoryRevocationStore::new()), family, rotate)
    }

    #[tokio::test]
    async fn generated_token_round_trips_to_the_same_subject() {
        let engine = engine(TokenFamily::Customer, false);
        let pair = engine.generate_tokens("42").unwrap();
        let claims = engine.validate_token(&pair.access_token).await.unwrap();
        assert_eq!(claims.subject_value, "42");
    }

    #[tokio::test]
    async fn cross_family_token_is_rejected() {
        let admin_engine = engine(TokenFamily::Admin, false);
        let customer_engine = engine(TokenFamily::Customer, false);

        let pair = admin_engine.generate_tokens("7").unwrap();

        let result = customer_engine.validate_token(&pair.access_token).await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));

        let admin_claims = admin_engine
            .validate_token(&pair.access_token)
            .await
            .unwrap();
        assert_eq!(admin_claims.subject_value, "7");
    }

    #[tokio::test]
    async fn revoked_token_fails_validation_with_revoked_kind() {
        let engine = engine(TokenFamily::Bot, false);
        let pair = engine.generate_tokens("9").unwrap();

        engine.revoke_token(&pair.access_token).await.unwrap();

        let result = engine.validate_token(&pair.access_token).await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test]
    async fn rotating_refresh_revokes_the_old_refresh_token() {
        let engine = engine(TokenFamily::Customer, true);
        let pair = engine.generate_tokens("42").unwrap();

        let new_pair = engine.refresh_tokens(&pair.refresh_token).await.unwrap();
        assert_ne!(new_pair.refresh_token, pair.refresh_token);

        let result = engine.validate_token(&pair.refresh_token).await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test]
    async fn non_rotating_refresh_leaves_old_refresh_token_usable() {
        let engine = engine(TokenFamily::Customer, false);
        let pair = engine.generate_tokens("42").unwrap();

        engine.refresh_tokens(&pair.refresh_token).await.unwrap();

        let claims = engine.validate_token(&pair.refresh_token).await.unwrap();
        assert_eq!(claims.subject_value, "42");
    }
}
