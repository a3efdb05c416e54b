//! Configuration loading from various sources

use crate::config::{AppConfig, JwtSigningMode};
use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;

pub struct ConfigLoader {
    config_dir: String,
    environment: String,
}

impl ConfigLoader {
    pub fn new(config_dir: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            environment: environment.into(),
        }
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = Config::builder();

        config = config.add_source(
            File::with_name(&format!("{}/default", self.config_dir)).required(false),
        );
        config = config.add_source(
            File::with_name(&format!("{}/{}", self.config_dir, self.environment))
                .required(false),
        );
        config = config.add_source(
            File::with_name(&format!("{}/local", self.config_dir)).required(false),
        );
        config = config.add_source(
            Environment::with_prefix("AUTH")
                .separator("__")
                .try_parsing(true),
        );

        let config = config.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;
        apply_flat_env_overrides(&mut app_config);
        Ok(app_config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        apply_flat_env_overrides(&mut app_config);
        Ok(app_config)
    }

    pub fn load_from_env() -> Result<AppConfig, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("AUTH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        apply_flat_env_overrides(&mut app_config);
        Ok(app_config)
    }
}

/// Overlays the flat environment variable names named in the external
/// interface contract (`ACCESS_TOKEN_TTL`, `JWT_ISSUER`, ...) on top of
/// whatever the layered `AUTH__*` sources produced. These are read
/// directly rather than through the `config` crate's `Environment`
/// source because they don't share its `AUTH__section__field` shape.
fn apply_flat_env_overrides(config: &mut AppConfig) {
    use std::env;

    if let Ok(v) = env::var("ACCESS_TOKEN_TTL") {
        if let Ok(seconds) = parse_duration_seconds(&v) {
            config.security.access_token_ttl_seconds = seconds;
        }
    }
    if let Ok(v) = env::var("REFRESH_TOKEN_TTL") {
        if let Ok(seconds) = parse_duration_seconds(&v) {
            config.security.refresh_token_ttl_seconds = seconds;
        }
    }
    if let Ok(v) = env::var("JWT_ISSUER") {
        config.security.jwt_issuer = v;
    }
    if let Ok(v) = env::var("JWT_AUDIENCE") {
        config.security.jwt_audience = v;
    }
    if let Ok(v) = env::var("JWT_USE_RSA") {
        config.security.jwt_use_rsa = match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => JwtSigningMode::Rsa,
            _ => JwtSigningMode::Hmac,
        };
    }
    if let Ok(v) = env::var("JWT_PRIVATE_KEY_PEM") {
        config.security.jwt_private_key_pem = Some(secrecy::Secret::new(v));
    }
    if let Ok(v) = env::var("JWT_PUBLIC_KEY_PEM") {
        config.security.jwt_public_key_pem = Some(v);
    }
    if let Ok(v) = env::var("JWT_SECRET_KEY") {
        config.security.jwt_secret_key = Some(secrecy::Secret::new(v));
    }
    if let Ok(v) = env::var("OTP_TTL_MINUTES") {
        if let Ok(minutes) = v.parse() {
            config.otp.ttl_minutes = minutes;
        }
    }
    if let Ok(v) = env::var("OTP_MAX_ATTEMPTS") {
        if let Ok(attempts) = v.parse() {
            config.otp.max_attempts = attempts;
        }
    }
}

/// Accepts either a bare integer (seconds) or a Go-style duration
/// suffix (`15m`, `7d`, `24h`) since operators commonly write TTLs
/// that way.
fn parse_duration_seconds(raw: &str) -> Result<i64, std::num::ParseIntError> {
    let raw = raw.trim();
    if let Some(num) = raw.strip_suffix('s') {
        return num.parse();
    }
    if let Some(num) = raw.strip_suffix('m') {
        return num.parse::<i64>().map(|v| v * 60);
    }
    if let Some(num) = raw.strip_suffix('h') {
        return num.parse::<i64>().map(|v| v * 3600);
    }
    if let Some(num) = raw.strip_suffix('d') {
        return num.parse::<i64>().map(|v| v * 86400);
    }
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_seconds() {
        assert_eq!(parse_duration_seconds("900").unwrap(), 900);
    }

    #[test]
    fn parses_suffixed_durations() {
        assert_eq!(parse_duration_seconds("15m").unwrap(), 900);
        assert_eq!(parse_duration_seconds("7d").unwrap(), 604_800);
        assert_eq!(parse_duration_seconds("1h").unwrap(), 3600);
    }
}
