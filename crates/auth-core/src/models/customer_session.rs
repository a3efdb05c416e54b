//! The `CustomerSession` entity: another append-only correlation chain,
//! this time for login sessions rather than OTPs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerSession {
    pub id: i64,
    pub correlation_id: Uuid,
    pub customer_id: i64,
    pub session_token: String,
    pub refresh_token: String,
    pub device_info: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CustomerSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn is_live(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

#[derive(Debug, Clone)]
pub struct NewCustomerSession {
    pub correlation_id: Uuid,
    pub customer_id: i64,
    pub session_token: String,
    pub refresh_token: String,
    pub device_info: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(is_active: bool, expires_in_secs: i64) -> CustomerSession {
        CustomerSession {
            id: 1,
            correlation_id: Uuid::new_v4(),
            customer_id: 1,
            session_token: "tok".into(),
            refresh_token: "ref".into(),
            device_info: serde_json::json!({}),
            ip_address: None,
            user_agent: None,
            is_active,
            created_at: Utc::now(),
            last_accessed_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in_secs),
        }
    }

    #[test]
    fn active_unexpired_session_is_live() {
        assert!(session(true, 60).is_live());
    }

    #[test]
    fn expired_session_is_not_live_even_if_flagged_active() {
        assert!(!session(true, -1).is_live());
    }

    #[test]
    fn inactive_session_is_not_live() {
        assert!(!session(false, 60).is_live());
    }
}
