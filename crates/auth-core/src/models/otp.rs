//! The `OTPVerification` entity: an append-only correlation chain.
//!
//! A logical OTP is not one row -- it's a chain of rows sharing the same
//! `correlation_id`. The pending row that starts the chain is never
//! mutated; every transition (verified/failed/expired/used) is a new row.
//! See `auth-core::services::otp` for the engine that walks this chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OtpType {
    Mobile,
    Email,
    PasswordReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OtpStatus {
    Pending,
    Verified,
    Failed,
    Expired,
    Used,
}

impl OtpStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OtpVerification {
    pub id: i64,
    pub correlation_id: Uuid,
    pub customer_id: i64,
    pub otp_type: OtpType,
    pub target_value: String,
    pub otp_code: String,
    pub status: OtpStatus,
    pub attempts_count: i32,
    pub max_attempts: i32,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OtpVerification {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn is_attempts_exhausted(&self) -> bool {
        self.attempts_count >= self.max_attempts
    }

    /// `NoValidOTP` applies whenever the pending row can no longer be
    /// consumed, whether by time or by attempt volume -- the spec requires
    /// both failure modes to surface identically so neither is revealed to
    /// the caller.
    pub fn is_consumable(&self) -> bool {
        self.status == OtpStatus::Pending && !self.is_expired() && !self.is_attempts_exhausted()
    }
}

/// A row not yet assigned a surrogate id -- what `OtpRepository::insert_pending`
/// accepts.
#[derive(Debug, Clone)]
pub struct NewOtpVerification {
    pub correlation_id: Uuid,
    pub customer_id: i64,
    pub otp_type: OtpType,
    pub target_value: String,
    pub otp_code: String,
    pub max_attempts: i32,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: OtpStatus, attempts: i32, expires_in_secs: i64) -> OtpVerification {
        OtpVerification {
            id: 1,
            correlation_id: Uuid::new_v4(),
            customer_id: 1,
            otp_type: OtpType::Mobile,
            target_value: "+989123456789".into(),
            otp_code: "123456".into(),
            status,
            attempts_count: attempts,
            max_attempts: 3,
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in_secs),
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_unexpired_under_attempt_limit_is_consumable() {
        assert!(row(OtpStatus::Pending, 1, 300).is_consumable());
    }

    #[test]
    fn expired_row_is_not_consumable_even_if_pending() {
        assert!(!row(OtpStatus::Pending, 0, -1).is_consumable());
    }

    #[test]
    fn attempts_exhausted_row_is_not_consumable() {
        assert!(!row(OtpStatus::Pending, 3, 300).is_consumable());
    }

    #[test]
    fn terminal_statuses_are_never_consumable() {
        assert!(!row(OtpStatus::Verified, 0, 300).is_consumable());
        assert!(OtpStatus::Verified.is_terminal());
        assert!(!OtpStatus::Pending.is_terminal());
    }
}
