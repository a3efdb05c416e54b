//! Configuration validation utilities beyond field-level `validator` derives

use crate::config::{AppConfig, JwtSigningMode};
use secrecy::ExposeSecret;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("Security validation failed: {message}")]
    SecurityValidationFailed { message: String },

    #[error("Database validation failed: {message}")]
    DatabaseValidationFailed { message: String },

    #[error("OTP validation failed: {message}")]
    OtpValidationFailed { message: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate_config(config: &AppConfig) -> Result<(), ConfigValidationError> {
        config.validate()?;
        Self::validate_security_config(config)?;
        Self::validate_database_config(config)?;
        Self::validate_otp_config(config)?;
        Ok(())
    }

    fn validate_security_config(config: &AppConfig) -> Result<(), ConfigValidationError> {
        let security = &config.security;

        match security.jwt_use_rsa {
            JwtSigningMode::Hmac => {
                let secret = security.jwt_secret_key.as_ref().ok_or_else(|| {
                    ConfigValidationError::SecurityValidationFailed {
                        message: "HMAC signing requires JWT_SECRET_KEY".to_string(),
                    }
                })?;
                if secret.expose_secret().len() < 32 {
                    return Err(ConfigValidationError::SecurityValidationFailed {
                        message: "JWT secret must be at least 32 bytes".to_string(),
                    });
                }
            }
            JwtSigningMode::Rsa => {
                if security.jwt_private_key_pem.is_none() || security.jwt_public_key_pem.is_none()
                {
                    return Err(ConfigValidationError::SecurityValidationFailed {
                        message:
                            "RSA signing requires both JWT_PRIVATE_KEY_PEM and JWT_PUBLIC_KEY_PEM"
                                .to_string(),
                    });
                }
            }
        }

        if security.access_token_ttl_seconds <= 0 {
            return Err(ConfigValidationError::SecurityValidationFailed {
                message: "Access token TTL must be positive".to_string(),
            });
        }

        if security.refresh_token_ttl_seconds < security.access_token_ttl_seconds {
            return Err(ConfigValidationError::SecurityValidationFailed {
                message: "Refresh token TTL must be >= access token TTL".to_string(),
            });
        }

        if security.password_min_length < 8 {
            return Err(ConfigValidationError::SecurityValidationFailed {
                message: "Password minimum length must be at least 8 characters".to_string(),
            });
        }

        Ok(())
    }

    fn validate_database_config(config: &AppConfig) -> Result<(), ConfigValidationError> {
        let db = &config.database;

        if db.max_connections < db.min_connections {
            return Err(ConfigValidationError::DatabaseValidationFailed {
                message: "Max connections must be greater than or equal to min connections"
                    .to_string(),
            });
        }

        Ok(())
    }

    fn validate_otp_config(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.otp.ttl_minutes <= 0 {
            return Err(ConfigValidationError::OtpValidationFailed {
                message: "OTP_TTL_MINUTES must be > 0".to_string(),
            });
        }
        if config.otp.max_attempts == 0 {
            return Err(ConfigValidationError::OtpValidationFailed {
                message: "OTP_MAX_ATTEMPTS must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_test_config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_valid_config() {
        assert!(ConfigValidator::validate_config(&valid_test_config()).is_ok());
    }

    #[test]
    fn test_invalid_jwt_secret() {
        let mut config = valid_test_config();
        config.security.jwt_secret_key = Some(secrecy::Secret::new("too-short".to_string()));
        let result = ConfigValidator::validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigValidationError::SecurityValidationFailed { .. })
        ));
    }

    #[test]
    fn test_rsa_mode_requires_keys() {
        let mut config = valid_test_config();
        config.security.jwt_use_rsa = JwtSigningMode::Rsa;
        config.security.jwt_private_key_pem = None;
        config.security.jwt_public_key_pem = None;
        let result = ConfigValidator::validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigValidationError::SecurityValidationFailed { .. })
        ));
    }

    #[test]
    fn test_refresh_ttl_must_not_be_shorter_than_access_ttl() {
        let mut config = valid_test_config();
        config.security.refresh_token_ttl_seconds = 10;
        config.security.access_token_ttl_seconds = 900;
        let result = ConfigValidator::validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigValidationError::SecurityValidationFailed { .. })
        ));
    }

    #[test]
    fn test_invalid_db_connections() {
        let mut config = valid_test_config();
        config.database.max_connections = 5;
        config.database.min_connections = 10;
        let result = ConfigValidator::validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigValidationError::DatabaseValidationFailed { .. })
        ));
    }

    #[test]
    fn test_invalid_otp_ttl() {
        let mut config = valid_test_config();
        config.otp.ttl_minutes = 0;
        let result = ConfigValidator::validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigValidationError::OtpValidationFailed { .. })
        ));
    }

    #[test]
    fn test_basic_validation() {
        let mut config = valid_test_config();
        config.server.port = 0;
        let result = ConfigValidator::validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigValidationError::ValidationFailed(_))
        ));
    }
}
