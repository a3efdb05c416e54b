//! Database connection management

use anyhow::Result;
use auth_config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use std::time::Duration;

/// Pool sizing and timeouts all come from config -- no hardcoded capacity
/// numbers here, so tuning for a given deployment doesn't require a
/// rebuild.
pub async fn create_mysql_pool(config: &DatabaseConfig) -> Result<Pool<MySql>> {
    let options = config.url.expose_secret().parse::<MySqlConnectOptions>()?;

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Some(Duration::from_secs(config.idle_timeout_seconds)))
        .max_lifetime(Some(Duration::from_secs(config.max_lifetime_seconds)))
        .test_before_acquire(true)
        .connect_with(options)
        .await?;

    Ok(pool)
}
