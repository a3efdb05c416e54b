//! Key management for JWT signing and verification
//!
//! A deployment picks exactly one signing mode at startup -- HMAC-SHA-256
//! with a shared secret, or RSA-256 with a PEM keypair -- and never mixes
//! them for the lifetime of the process.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Key generation failed: {0}")]
    GenerationError(String),
    #[error("Key loading failed: {0}")]
    LoadingError(String),
    #[error("Invalid key format: {0}")]
    InvalidFormat(String),
    #[error("Missing key material for signing mode: {0}")]
    MissingMaterial(String),
}

#[derive(Clone)]
pub struct KeyManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl KeyManager {
    /// Build a key manager from a shared HMAC secret.
    pub fn from_hmac_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
        }
    }

    /// Build a key manager from an RSA PEM keypair.
    pub fn from_rsa_pem(private_key_pem: &str, public_key_pem: &str) -> Result<Self, KeyError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| KeyError::LoadingError(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| KeyError::LoadingError(e.to_string()))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: Algorithm::RS256,
        })
    }

    /// Load an RSA keypair from files on disk.
    pub async fn from_pem_files(
        private_key_path: &str,
        public_key_path: &str,
    ) -> Result<Self, KeyError> {
        let private_key_pem = tokio::fs::read_to_string(private_key_path)
            .await
            .map_err(|e| KeyError::LoadingError(format!("Failed to read private key: {}", e)))?;
        let public_key_pem = tokio::fs::read_to_string(public_key_path)
            .await
            .map_err(|e| KeyError::LoadingError(format!("Failed to read public key: {}", e)))?;

        Self::from_rsa_pem(&private_key_pem, &public_key_pem)
    }

    /// Fixed RSA keypair used by the crate's own test suite.
    pub fn new_for_testing() -> Self {
        let private_key_pem = include_str!("../test_keys/private_key.pem");
        let public_key_pem = include_str!("../test_keys/public_key.pem");
        Self::from_rsa_pem(private_key_pem, public_key_pem)
            .expect("bundled test keypair must parse")
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_mode_reports_hs256() {
        let manager = KeyManager::from_hmac_secret("a-sufficiently-long-test-secret");
        assert_eq!(manager.algorithm(), Algorithm::HS256);
    }

    #[test]
    fn rsa_mode_reports_rs256() {
        let manager = KeyManager::new_for_testing();
        assert_eq!(manager.algorithm(), Algorithm::RS256);
    }

    #[test]
    fn rejects_malformed_pem() {
        let result = KeyManager::from_rsa_pem("not a key", "also not a key");
        assert!(result.is_err());
    }
}
