//! `SessionRepository` (C3 persistence): append-only `customer_sessions`
//! table, same correlation-chain shape as `otp_repository.rs`.

use async_trait::async_trait;
use auth_core::error::AuthError;
use auth_core::models::customer_session::{CustomerSession, NewCustomerSession};
use auth_core::services::session::SessionRepository as SessionRepositoryContract;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionRepository {
    pool: MySqlPool,
}

impl SessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn map_row(row: sqlx::mysql::MySqlRow) -> Result<CustomerSession, sqlx::Error> {
        let correlation_id_str: String = row.try_get("correlation_id")?;
        Ok(CustomerSession {
            id: row.try_get("id")?,
            correlation_id: Uuid::parse_str(&correlation_id_str).unwrap_or_else(|_| Uuid::new_v4()),
            customer_id: row.try_get("customer_id")?,
            session_token: row.try_get("session_token")?,
            refresh_token: row.try_get("refresh_token")?,
            device_info: row.try_get("device_info")?,
            ip_address: row.try_get("ip_address")?,
            user_agent: row.try_get("user_agent")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            last_accessed_at: row.try_get("last_accessed_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        id, correlation_id, customer_id, session_token, refresh_token, device_info,
        ip_address, user_agent, is_active, created_at, last_accessed_at, expires_at
    "#;
}

#[async_trait]
impl SessionRepositoryContract for SessionRepository {
    async fn insert(&self, new: NewCustomerSession) -> Result<CustomerSession, AuthError> {
        let now = chrono::Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO customer_sessions (
                correlation_id, customer_id, session_token, refresh_token, device_info,
                ip_address, user_agent, is_active, created_at, last_accessed_at, expires_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, true, ?, ?, ?)
            "#,
        )
        .bind(new.correlation_id.to_string())
        .bind(new.customer_id)
        .bind(&new.session_token)
        .bind(&new.refresh_token)
        .bind(&new.device_info)
        .bind(&new.ip_address)
        .bind(&new.user_agent)
        .bind(now)
        .bind(now)
        .bind(new.expires_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        let row = sqlx::query(&format!(
            "SELECT {} FROM customer_sessions WHERE id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Self::map_row(row).map_err(AuthError::from)
    }

    async fn find_by_session_token(
        &self,
        token: &str,
    ) -> Result<Option<CustomerSession>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customer_sessions WHERE session_token = ? ORDER BY id DESC LIMIT 1",
            Self::SELECT_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<CustomerSession>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customer_sessions WHERE refresh_token = ? ORDER BY id DESC LIMIT 1",
            Self::SELECT_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn list_active_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<CustomerSession>, AuthError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM customer_sessions WHERE customer_id = ? AND is_active = true",
            Self::SELECT_COLUMNS
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(Self::map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AuthError::from)
    }

    async fn expire(&self, session: &CustomerSession) -> Result<CustomerSession, AuthError> {
        let now = chrono::Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO customer_sessions (
                correlation_id, customer_id, session_token, refresh_token, device_info,
                ip_address, user_agent, is_active, created_at, last_accessed_at, expires_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, false, ?, ?, ?)
            "#,
        )
        .bind(session.correlation_id.to_string())
        .bind(session.customer_id)
        .bind(&session.session_token)
        .bind(&session.refresh_token)
        .bind(&session.device_info)
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(now)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        let row = sqlx::query(&format!(
            "SELECT {} FROM customer_sessions WHERE id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Self::map_row(row).map_err(AuthError::from)
    }

    async fn expire_all_for_customer(&self, customer_id: i64) -> Result<u64, AuthError> {
        let active = self.list_active_by_customer(customer_id).await?;
        let count = active.len() as u64;
        for session in active {
            self.expire(&session).await?;
        }
        Ok(count)
    }

    async fn history_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> Result<Vec<CustomerSession>, AuthError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM customer_sessions WHERE correlation_id = ? ORDER BY id",
            Self::SELECT_COLUMNS
        ))
        .bind(correlation_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(Self::map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AuthError::from)
    }
}
