//! JWT issuance and validation, generalized over the calling token family.
//!
//! The crate doesn't know about "customers" or "admins" -- callers pass the
//! claim name their family uses for the subject (`customer_id`, `admin_id`,
//! `bot_id`, ...) and get back a token whose only hardcoded claims are the
//! registered ones (`iss`, `aud`, `exp`, `iat`, `jti`) plus `token_type`.

use crate::keys::KeyManager;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("Token validation failed: {reason}")]
    ValidationError { reason: String },
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidFormat,
    #[error("Key management error: {0}")]
    KeyError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: "campaign-auth".to_string(),
            audience: "campaign-platform".to_string(),
            access_token_ttl: chrono::Duration::minutes(15),
            refresh_token_ttl: chrono::Duration::days(7),
        }
    }
}

/// Claims as handed back to a caller after a successful decode. `subject_value`
/// is whatever was stored under `subject_claim_name` at issuance time.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject_claim_name: String,
    pub subject_value: String,
    pub token_type: TokenType,
    pub jti: String,
    pub issued_at: i64,
    pub expires_at: i64,
    pub issuer: String,
    pub audience: String,
}

impl TokenClaims {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now().timestamp()
    }
}

pub struct JwtService {
    config: JwtConfig,
    key_manager: KeyManager,
}

impl JwtService {
    pub fn new(config: JwtConfig, key_manager: KeyManager) -> Self {
        Self { config, key_manager }
    }

    /// Issue a single token carrying `subject_value` under `subject_claim_name`.
    pub fn issue(
        &self,
        subject_claim_name: &str,
        subject_value: &str,
        token_type: TokenType,
    ) -> Result<(String, TokenClaims), JwtError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.config.access_token_ttl,
            TokenType::Refresh => self.config.refresh_token_ttl,
        };
        let exp = now + ttl;
        let jti = Uuid::new_v4().to_string();

        let mut claims = serde_json::Map::new();
        claims.insert("iss".to_string(), json!(self.config.issuer));
        claims.insert("aud".to_string(), json!(self.config.audience));
        claims.insert("exp".to_string(), json!(exp.timestamp()));
        claims.insert("iat".to_string(), json!(now.timestamp()));
        claims.insert("jti".to_string(), json!(jti));
        claims.insert("token_type".to_string(), json!(token_type));
        claims.insert(subject_claim_name.to_string(), json!(subject_value));

        let header = Header::new(self.key_manager.algorithm());
        let token = encode(
            &header,
            &serde_json::Value::Object(claims),
            self.key_manager.encoding_key(),
        )?;

        Ok((
            token,
            TokenClaims {
                subject_claim_name: subject_claim_name.to_string(),
                subject_value: subject_value.to_string(),
                token_type,
                jti,
                issued_at: now.timestamp(),
                expires_at: exp.timestamp(),
                issuer: self.config.issuer.clone(),
                audience: self.config.audience.clone(),
            },
        ))
    }

    /// Issue an (access, refresh) pair for the same subject.
    pub fn issue_pair(
        &self,
        subject_claim_name: &str,
        subject_value: &str,
    ) -> Result<((String, TokenClaims), (String, TokenClaims)), JwtError> {
        let access = self.issue(subject_claim_name, subject_value, TokenType::Access)?;
        let refresh = self.issue(subject_claim_name, subject_value, TokenType::Refresh)?;
        Ok((access, refresh))
    }

    /// Parse and validate `token`, requiring it to carry `subject_claim_name`.
    /// A token issued for a different family (missing claim) is `TokenInvalid`
    /// in spec terms, surfaced here as `ValidationError`.
    pub fn decode_and_validate(
        &self,
        token: &str,
        subject_claim_name: &str,
    ) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(self.key_manager.algorithm());
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;

        let token_data = decode::<serde_json::Value>(token, self.key_manager.decoding_key(), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError {
                    reason: e.to_string(),
                },
            })?;

        let obj = token_data
            .claims
            .as_object()
            .ok_or(JwtError::InvalidFormat)?;

        let subject_value = obj
            .get(subject_claim_name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| JwtError::ValidationError {
                reason: format!("token does not carry claim `{}`", subject_claim_name),
            })?
            .to_string();

        let token_type: TokenType = obj
            .get("token_type")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .ok_or_else(|| JwtError::ValidationError {
                reason: "token missing token_type claim".to_string(),
            })?;

        let jti = obj
            .get("jti")
            .and_then(|v| v.as_str())
            .ok_or_else(|| JwtError::ValidationError {
                reason: "token missing jti claim".to_string(),
            })?
            .to_string();

        let issued_at = obj.get("iat").and_then(|v| v.as_i64()).unwrap_or(0);
        let expires_at = obj.get("exp").and_then(|v| v.as_i64()).unwrap_or(0);

        Ok(TokenClaims {
            subject_claim_name: subject_claim_name.to_string(),
            subject_value,
            token_type,
            jti,
            issued_at,
            expires_at,
            issuer: self.config.issuer.clone(),
            audience: self.config.audience.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyManager;

    fn service() -> JwtService {
        JwtService::new(JwtConfig::default(), KeyManager::from_hmac_secret(
            "unit-test-secret-at-least-32-bytes-long",
        ))
    }

    #[test]
    fn issues_and_validates_a_token() {
        let svc = service();
        let (token, claims) = svc
            .issue("customer_id", "42", TokenType::Access)
            .unwrap();

        let decoded = svc.decode_and_validate(&token, "customer_id").unwrap();
        assert_eq!(decoded.subject_value, "42");
        assert_eq!(decoded.token_type, TokenType::Access);
        assert_eq!(decoded.jti, claims.jti);
        assert!(!decoded.is_expired());
    }

    #[test]
    fn rejects_token_missing_the_expected_claim() {
        let svc = service();
        let (token, _) = svc.issue("admin_id", "7", TokenType::Access).unwrap();

        let result = svc.decode_and_validate(&token, "customer_id");
        assert!(matches!(result, Err(JwtError::ValidationError { .. })));
    }

    #[test]
    fn expired_token_is_reported_distinctly() {
        let mut config = JwtConfig::default();
        config.access_token_ttl = chrono::Duration::milliseconds(1);
        let svc = JwtService::new(
            config,
            KeyManager::from_hmac_secret("unit-test-secret-at-least-32-bytes-long"),
        );

        let (token, _) = svc.issue("bot_id", "9", TokenType::Access).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));

        let result = svc.decode_and_validate(&token, "bot_id");
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn rsa_mode_round_trips() {
        let svc = JwtService::new(JwtConfig::default(), KeyManager::new_for_testing());
        let (token, _) = svc
            .issue("customer_id", "1001", TokenType::Refresh)
            .unwrap();
        let decoded = svc.decode_and_validate(&token, "customer_id").unwrap();
        assert_eq!(decoded.subject_value, "1001");
        assert_eq!(decoded.token_type, TokenType::Refresh);
    }
}
