//! Durable, append-only audit log persistence.
//!
//! Rows are never mutated or deleted once written. `AuditService` owns the
//! only write path into `audit_logs`; every insert also fires a
//! `tracing::info!` at `target: "audit"` so the same events reach whatever
//! pipeline scrapes structured logs, without a second write path to keep
//! in sync.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    SignupInitiated,
    SignupCompleted,
    OtpSent,
    OtpVerified,
    OtpFailed,
    LoginSuccess,
    LoginFailed,
    PasswordResetRequested,
    PasswordResetCompleted,
    PasswordResetFailed,
    SessionExpired,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignupInitiated => "signup_initiated",
            Self::SignupCompleted => "signup_completed",
            Self::OtpSent => "otp_sent",
            Self::OtpVerified => "otp_verified",
            Self::OtpFailed => "otp_failed",
            Self::LoginSuccess => "login_success",
            Self::LoginFailed => "login_failed",
            Self::PasswordResetRequested => "password_reset_requested",
            Self::PasswordResetCompleted => "password_reset_completed",
            Self::PasswordResetFailed => "password_reset_failed",
            Self::SessionExpired => "session_expired",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub action: AuditAction,
    pub success: bool,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A single audit record awaiting persistence; `id`/`created_at` are
/// assigned by the database.
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub customer_id: Option<i64>,
    pub action: AuditAction,
    pub success: bool,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuditService {
    pool: MySqlPool,
}

impl AuditService {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Appends exactly one row. Never fails the caller's surrounding
    /// business transaction on its own -- callers that need the audit
    /// write inside the same transaction should use `record_in` instead.
    pub async fn record(&self, entry: NewAuditLog) -> Result<AuditLog> {
        let mut tx = self.pool.begin().await?;
        let log = Self::insert(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(log)
    }

    /// Appends all of `entries` atomically: either every row is committed
    /// or none are.
    pub async fn record_batch(&self, entries: Vec<NewAuditLog>) -> Result<Vec<AuditLog>> {
        let mut tx = self.pool.begin().await?;
        let mut logs = Vec::with_capacity(entries.len());
        for entry in entries {
            logs.push(Self::insert(&mut tx, entry).await?);
        }
        tx.commit().await?;
        Ok(logs)
    }

    /// Appends a row using an already-open transaction, so it commits or
    /// rolls back with the caller's business mutation.
    pub async fn record_in(
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        entry: NewAuditLog,
    ) -> Result<AuditLog> {
        Self::insert(tx, entry).await
    }

    async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        entry: NewAuditLog,
    ) -> Result<AuditLog> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO audit_logs
                (customer_id, action, success, description, ip_address, user_agent, error_message, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.customer_id)
        .bind(entry.action.as_str())
        .bind(entry.success)
        .bind(&entry.description)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.error_message)
        .bind(created_at)
        .execute(&mut **tx)
        .await?;

        // Fired alongside the durable row so audit events are also visible
        // to whatever pipeline scrapes `tracing` output (ELK/Splunk/etc.),
        // without requiring a read of `audit_logs` to see them.
        info!(
            target: "audit",
            customer_id = ?entry.customer_id,
            action = entry.action.as_str(),
            success = entry.success,
            "AUDIT_EVENT"
        );

        Ok(AuditLog {
            id: result.last_insert_id() as i64,
            customer_id: entry.customer_id,
            action: entry.action,
            success: entry.success,
            description: entry.description,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            error_message: entry.error_message,
            created_at,
        })
    }

    pub async fn history_for_customer(&self, customer_id: i64, limit: u32) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs WHERE customer_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Used by flows that want to fire an audit record without blocking on the
/// database succeeding -- per the spec, a failing audit write for a
/// read-only successful event must not roll back the surrounding flow.
pub async fn record_best_effort(service: &AuditService, entry: NewAuditLog) {
    if let Err(e) = service.record(entry).await {
        warn!("best-effort audit write failed: {}", e);
    }
}
