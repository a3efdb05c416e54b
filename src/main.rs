//! Entry point: loads configuration, opens the MySQL pool, wires the
//! repository/service graph for all three token families, and serves the
//! `auth-api` router.

use std::sync::Arc;

use anyhow::{Context, Result};
use auth_audit::AuditService;
use auth_cache::{InMemoryRevocationStore, NullRevocationStore, RedisRevocationStore, RevocationStore};
use auth_config::{AppConfig, ConfigLoader, ConfigManager, ConfigValidator, JwtSigningMode};
use auth_core::services::login::LoginFlow;
use auth_core::services::notification::{LoggingNotifier, Notifier};
use auth_core::services::otp::OtpEngine;
use auth_core::services::session::SessionService;
use auth_core::services::signup::SignupFlow;
use auth_core::services::token::{TokenEngine, TokenFamily};
use auth_core::transaction::UnitOfWork;
use auth_crypto::{JwtConfig, JwtService, KeyManager};
use auth_db::repositories::{AccountTypeRepository, CustomerRepository, OtpRepository, SessionRepository};
use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_manager = ConfigManager::new(ConfigLoader::new(
        std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()),
        std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    ))
    .context("failed to load configuration")?;
    let config = config_manager.get_config();
    ConfigValidator::validate_config(&config).context("configuration failed validation")?;

    let pool = auth_db::create_mysql_pool(&config.database)
        .await
        .context("failed to open MySQL pool")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let customers = Arc::new(CustomerRepository::new(pool.clone()));
    let account_types = Arc::new(AccountTypeRepository::new(pool.clone()));
    let otp_repo = Arc::new(OtpRepository::new(pool.clone()));
    let session_repo = Arc::new(SessionRepository::new(pool.clone()));
    let audit = Arc::new(AuditService::new(pool.clone()));
    let uow = Arc::new(UnitOfWork::new(pool.clone()));

    let revocation = build_revocation_store(&config)?;
    let key_manager = build_key_manager(&config).await?;
    let jwt_config = JwtConfig {
        issuer: config.security.jwt_issuer.clone(),
        audience: config.security.jwt_audience.clone(),
        access_token_ttl: chrono::Duration::seconds(config.security.access_token_ttl_seconds),
        refresh_token_ttl: chrono::Duration::seconds(config.security.refresh_token_ttl_seconds),
    };
    let jwt_service = JwtService::new(jwt_config, key_manager);

    let customer_tokens = Arc::new(TokenEngine::new(
        jwt_service,
        revocation,
        TokenFamily::Customer,
        config.security.rotate_refresh_tokens,
    ));

    let otp_engine = Arc::new(OtpEngine::new(
        otp_repo,
        config.otp.ttl_minutes,
        config.otp.max_attempts as i32,
    ));
    let session_service = Arc::new(SessionService::new(
        session_repo,
        chrono::Duration::seconds(config.security.refresh_token_ttl_seconds),
    ));
    let notifier = build_notifier(&config);

    let signup = Arc::new(SignupFlow::new(
        customers.clone(),
        account_types,
        otp_engine.clone(),
        session_service.clone(),
        customer_tokens.clone(),
        audit.clone(),
        notifier,
        uow.clone(),
        config.security.password_min_length,
    ));
    let login = Arc::new(LoginFlow::new(
        customers,
        otp_engine,
        session_service,
        customer_tokens,
        audit,
        uow,
        config.security.password_min_length,
    ));

    let state = auth_api::AppState { signup, login };
    let app = auth_api::app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(%addr, "starting campaign-auth-core");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// `REDIS_URL` selects the Redis-backed store (needed for multi-instance
/// deployments so revocation is visible across processes); `SINGLE_INSTANCE`
/// opts into the no-op store for throwaway/dev setups; otherwise the
/// in-memory store is the default.
fn build_revocation_store(_config: &AppConfig) -> Result<Arc<dyn RevocationStore>> {
    match std::env::var("REDIS_URL") {
        Ok(url) if !url.is_empty() => Ok(Arc::new(
            RedisRevocationStore::new(&url).context("failed to connect to Redis")?,
        )),
        _ if std::env::var("SINGLE_INSTANCE").is_ok() => Ok(Arc::new(NullRevocationStore)),
        _ => Ok(Arc::new(InMemoryRevocationStore::new())),
    }
}

async fn build_key_manager(config: &AppConfig) -> Result<KeyManager> {
    match config.security.jwt_use_rsa {
        JwtSigningMode::Hmac => {
            let secret = config
                .security
                .jwt_secret_key
                .as_ref()
                .context("HMAC signing requires jwt_secret_key")?;
            Ok(KeyManager::from_hmac_secret(secret.expose_secret()))
        }
        JwtSigningMode::Rsa => {
            let private = config
                .security
                .jwt_private_key_pem
                .as_ref()
                .context("RSA signing requires jwt_private_key_pem")?;
            let public = config
                .security
                .jwt_public_key_pem
                .as_ref()
                .context("RSA signing requires jwt_public_key_pem")?;
            KeyManager::from_rsa_pem(private.expose_secret(), public).map_err(|e| anyhow::anyhow!(e))
        }
    }
}

fn build_notifier(_config: &AppConfig) -> Arc<dyn Notifier> {
    Arc::new(LoggingNotifier)
}
