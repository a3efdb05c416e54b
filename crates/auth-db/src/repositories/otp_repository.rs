//! `OtpRepository` (C4 persistence): append-only `otp_verifications` table.
//! Grounded on the teacher's `OtpRepository` (`otp_sessions` table, one
//! method per operation) but never mutates a row in place -- every
//! transition is an `INSERT`, matching the correlation-chain contract.

use async_trait::async_trait;
use auth_core::error::AuthError;
use auth_core::models::otp::{NewOtpVerification, OtpStatus, OtpType, OtpVerification};
use auth_core::services::otp::OtpRepository as OtpRepositoryContract;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct OtpRepository {
    pool: MySqlPool,
}

impl OtpRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn map_row(row: sqlx::mysql::MySqlRow) -> Result<OtpVerification, sqlx::Error> {
        let correlation_id_str: String = row.try_get("correlation_id")?;
        Ok(OtpVerification {
            id: row.try_get("id")?,
            correlation_id: Uuid::parse_str(&correlation_id_str).unwrap_or_else(|_| Uuid::new_v4()),
            customer_id: row.try_get("customer_id")?,
            otp_type: row.try_get("otp_type")?,
            target_value: row.try_get("target_value")?,
            otp_code: row.try_get("otp_code")?,
            status: row.try_get("status")?,
            attempts_count: row.try_get("attempts_count")?,
            max_attempts: row.try_get("max_attempts")?,
            expires_at: row.try_get("expires_at")?,
            ip_address: row.try_get("ip_address")?,
            user_agent: row.try_get("user_agent")?,
            created_at: row.try_get("created_at")?,
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        id, correlation_id, customer_id, otp_type, target_value, otp_code,
        status, attempts_count, max_attempts, expires_at, ip_address, user_agent, created_at
    "#;

    async fn insert_row(
        &self,
        correlation_id: Uuid,
        customer_id: i64,
        otp_type: OtpType,
        target_value: &str,
        otp_code: &str,
        status: OtpStatus,
        attempts_count: i32,
        max_attempts: i32,
        expires_at: chrono::DateTime<chrono::Utc>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<OtpVerification, AuthError> {
        let result = sqlx::query(
            r#"
            INSERT INTO otp_verifications (
                correlation_id, customer_id, otp_type, target_value, otp_code,
                status, attempts_count, max_attempts, expires_at, ip_address, user_agent, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(correlation_id.to_string())
        .bind(customer_id)
        .bind(otp_type)
        .bind(target_value)
        .bind(otp_code)
        .bind(status)
        .bind(attempts_count)
        .bind(max_attempts)
        .bind(expires_at)
        .bind(ip_address)
        .bind(user_agent)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        let row = sqlx::query(&format!(
            "SELECT {} FROM otp_verifications WHERE id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Self::map_row(row).map_err(AuthError::from)
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_row_in(
        &self,
        correlation_id: Uuid,
        customer_id: i64,
        otp_type: OtpType,
        target_value: &str,
        otp_code: &str,
        status: OtpStatus,
        attempts_count: i32,
        max_attempts: i32,
        expires_at: chrono::DateTime<chrono::Utc>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<OtpVerification, AuthError> {
        let result = sqlx::query(
            r#"
            INSERT INTO otp_verifications (
                correlation_id, customer_id, otp_type, target_value, otp_code,
                status, attempts_count, max_attempts, expires_at, ip_address, user_agent, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(correlation_id.to_string())
        .bind(customer_id)
        .bind(otp_type)
        .bind(target_value)
        .bind(otp_code)
        .bind(status)
        .bind(attempts_count)
        .bind(max_attempts)
        .bind(expires_at)
        .bind(ip_address)
        .bind(user_agent)
        .bind(chrono::Utc::now())
        .execute(&mut **tx)
        .await?;

        let id = result.last_insert_id() as i64;
        let row = sqlx::query(&format!(
            "SELECT {} FROM otp_verifications WHERE id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
        Self::map_row(row).map_err(AuthError::from)
    }
}

#[async_trait]
impl OtpRepositoryContract for OtpRepository {
    async fn expire_old(&self, customer_id: i64, otp_type: OtpType) -> Result<(), AuthError> {
        let pending = sqlx::query(&format!(
            "SELECT {} FROM otp_verifications WHERE customer_id = ? AND otp_type = ? AND status = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(customer_id)
        .bind(otp_type)
        .bind(OtpStatus::Pending)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::map_row)
        .collect::<Result<Vec<_>, _>>()?;

        for row in pending {
            self.append_successor(&row, OtpStatus::Expired, row.attempts_count)
                .await?;
        }
        Ok(())
    }

    async fn insert_pending(&self, new: NewOtpVerification) -> Result<OtpVerification, AuthError> {
        self.insert_row(
            new.correlation_id,
            new.customer_id,
            new.otp_type,
            &new.target_value,
            &new.otp_code,
            OtpStatus::Pending,
            0,
            new.max_attempts,
            new.expires_at,
            new.ip_address.as_deref(),
            new.user_agent.as_deref(),
        )
        .await
    }

    async fn insert_pending_in(
        &self,
        new: NewOtpVerification,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<OtpVerification, AuthError> {
        self.insert_row_in(
            new.correlation_id,
            new.customer_id,
            new.otp_type,
            &new.target_value,
            &new.otp_code,
            OtpStatus::Pending,
            0,
            new.max_attempts,
            new.expires_at,
            new.ip_address.as_deref(),
            new.user_agent.as_deref(),
            tx,
        )
        .await
    }

    async fn latest_pending(
        &self,
        customer_id: i64,
        otp_type: OtpType,
    ) -> Result<Option<OtpVerification>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM otp_verifications WHERE customer_id = ? AND otp_type = ? AND status = ? ORDER BY id DESC LIMIT 1",
            Self::SELECT_COLUMNS
        ))
        .bind(customer_id)
        .bind(otp_type)
        .bind(OtpStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn append_successor(
        &self,
        previous: &OtpVerification,
        status: OtpStatus,
        attempts_count: i32,
    ) -> Result<OtpVerification, AuthError> {
        self.insert_row(
            previous.correlation_id,
            previous.customer_id,
            previous.otp_type,
            &previous.target_value,
            &previous.otp_code,
            status,
            attempts_count,
            previous.max_attempts,
            previous.expires_at,
            previous.ip_address.as_deref(),
            previous.user_agent.as_deref(),
        )
        .await
    }

    async fn history_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> Result<Vec<OtpVerification>, AuthError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM otp_verifications WHERE correlation_id = ? ORDER BY id",
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
