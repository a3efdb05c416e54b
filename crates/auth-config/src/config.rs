//! Core configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub otp: OtpConfig,
    pub logging: LoggingConfig,
    pub external_services: ExternalServicesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
    pub host: String,
    pub workers: Option<usize>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: secrecy::Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// One-time deployment choice for how the token service signs tokens.
/// Mixing modes within a running process is never valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JwtSigningMode {
    Hmac,
    Rsa,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SecurityConfig {
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_use_rsa: JwtSigningMode,
    #[serde(skip_serializing)]
    pub jwt_secret_key: Option<secrecy::Secret<String>>,
    #[serde(skip_serializing)]
    pub jwt_private_key_pem: Option<secrecy::Secret<String>>,
    pub jwt_public_key_pem: Option<String>,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub rotate_refresh_tokens: bool,
    pub password_min_length: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OtpConfig {
    #[validate(range(min = 1))]
    pub ttl_minutes: i64,
    #[validate(range(min = 1))]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub structured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalServicesConfig {
    pub smtp: Option<SmtpConfig>,
    pub sms: Option<SmsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: secrecy::Secret<String>,
    pub from_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub provider_domain: String,
    #[serde(skip_serializing)]
    pub api_key: secrecy::Secret<String>,
    pub source_number: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8081,
                host: "0.0.0.0".to_string(),
                workers: None,
                request_timeout_seconds: Some(30),
            },
            database: DatabaseConfig {
                url: secrecy::Secret::new("mysql://localhost/campaign_auth".to_string()),
                max_connections: 200,
                min_connections: 20,
                connection_timeout_seconds: 30,
                idle_timeout_seconds: 300,
                max_lifetime_seconds: 1800,
            },
            security: SecurityConfig {
                jwt_issuer: "campaign-auth".to_string(),
                jwt_audience: "campaign-platform".to_string(),
                jwt_use_rsa: JwtSigningMode::Hmac,
                jwt_secret_key: Some(secrecy::Secret::new(
                    "change-me-in-production-32-bytes-min".to_string(),
                )),
                jwt_private_key_pem: None,
                jwt_public_key_pem: None,
                access_token_ttl_seconds: 15 * 60,
                refresh_token_ttl_seconds: 7 * 24 * 60 * 60,
                rotate_refresh_tokens: true,
                password_min_length: 8,
            },
            otp: OtpConfig {
                ttl_minutes: 5,
                max_attempts: 3,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
                structured: true,
            },
            external_services: ExternalServicesConfig {
                smtp: None,
                sms: None,
            },
        }
    }
}
