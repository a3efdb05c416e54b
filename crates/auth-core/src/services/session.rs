//! Session creation and lifecycle (§4.7). Opaque tokens replace the
//! teacher's bare `Uuid::new_v4()` session token with a CSPRNG-backed
//! 256-bit URL-safe random value -- well past the spec's 128-bit floor.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::AuthError;
use crate::models::customer_session::{CustomerSession, NewCustomerSession};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, new: NewCustomerSession) -> Result<CustomerSession, AuthError>;
    async fn find_by_session_token(
        &self,
        token: &str,
    ) -> Result<Option<CustomerSession>, AuthError>;
    async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<CustomerSession>, AuthError>;
    async fn list_active_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<CustomerSession>, AuthError>;
    /// Appends an `is_active=false` successor row for `session`, preserving
    /// `correlation_id`. Never mutates `session` in place.
    async fn expire(&self, session: &CustomerSession) -> Result<CustomerSession, AuthError>;
    async fn expire_all_for_customer(&self, customer_id: i64) -> Result<u64, AuthError>;
    async fn history_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> Result<Vec<CustomerSession>, AuthError>;
}

fn generate_opaque_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_info: serde_json::Value,
}

impl Default for ClientMeta {
    fn default() -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            device_info: serde_json::json!({}),
        }
    }
}

pub struct SessionService {
    repo: Arc<dyn SessionRepository>,
    refresh_ttl: Duration,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionRepository>, refresh_ttl: Duration) -> Self {
        Self { repo, refresh_ttl }
    }

    pub async fn create_session(
        &self,
        customer_id: i64,
        meta: ClientMeta,
    ) -> Result<CustomerSession, AuthError> {
        let new_session = NewCustomerSession {
            correlation_id: Uuid::new_v4(),
            customer_id,
            session_token: generate_opaque_token(),
            refresh_token: generate_opaque_token(),
            device_info: meta.device_info,
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
            expires_at: Utc::now() + self.refresh_ttl,
        };
        self.repo.insert(new_session).await
    }

    pub async fn revoke_session(&self, session_token: &str) -> Result<(), AuthError> {
        let Some(session) = self.repo.find_by_session_token(session_token).await? else {
            return Ok(());
        };
        if session.is_active {
            self.repo.expire(&session).await?;
        }
        Ok(())
    }

    /// Called by `resetPassword` per §4.6: every currently active session
    /// for the customer is expired before the new one is created.
    pub async fn revoke_all_for_customer(&self, customer_id: i64) -> Result<u64, AuthError> {
        self.repo.expire_all_for_customer(customer_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemorySessionRepository {
        rows: Mutex<Vec<CustomerSession>>,
        next_id: Mutex<i64>,
    }

    #[async_trait]
    impl SessionRepository for InMemorySessionRepository {
        async fn insert(&self, new: NewCustomerSession) -> Result<CustomerSession, AuthError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let row = CustomerSession {
                id: *next_id,
                correlation_id: new.correlation_id,
                customer_id: new.customer_id,
                session_token: new.session_token,
                refresh_token: new.refresh_token,
                device_info: new.device_info,
                ip_address: new.ip_address,
                user_agent: new.user_agent,
                is_active: true,
                created_at: Utc::now(),
                last_accessed_at: Utc::now(),
                expires_at: new.expires_at,
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn find_by_session_token(
            &self,
            token: &str,
        ) -> Result<Option<CustomerSession>, AuthError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|s| s.session_token == token)
                .cloned())
        }

        async fn find_by_refresh_token(
            &self,
            token: &str,
        ) -> Result<Option<CustomerSession>, AuthError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|s| s.refresh_token == token)
                .cloned())
        }

        async fn list_active_by_customer(
            &self,
            customer_id: i64,
        ) -> Result<Vec<CustomerSession>, AuthError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.customer_id == customer_id && s.is_active)
                .cloned()
                .collect())
        }

        async fn expire(&self, session: &CustomerSession) -> Result<CustomerSession, AuthError> {
            let mut rows = self.rows.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let successor = CustomerSession {
                id: *next_id,
                is_active: false,
                ..session.clone()
            };
            rows.push(successor.clone());
            Ok(successor)
        }

        async fn expire_all_for_customer(&self, customer_id: i64) -> Result<u64, AuthError> {
            let active: Vec<CustomerSession> = self
                .list_active_by_customer(customer_id)
                .await?
                .into_iter()
                .collect();
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
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.correlation_id == correlation_id)
                .cloned()
                .collect())
        }
    }

    fn service() -> SessionService {
        SessionService::new(
            Arc::new(InMemorySessionRepository::default()),
            Duration::days(7),
        )
    }

    #[tokio::test]
    async fn create_then_revoke_appends_inactive_successor_same_correlation() {
        let svc = service();
        let created = svc.create_session(1, ClientMeta::default()).await.unwrap();
        assert!(created.is_active);

        svc.revoke_session(&created.session_token).await.unwrap();

        let history = svc.repo.history_by_correlation(created.correlation_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_active);
        assert!(!history[1].is_active);
        assert_eq!(history[0].correlation_id, history[1].correlation_id);
    }

    #[tokio::test]
    async fn revoke_all_for_customer_expires_every_active_session() {
        let svc = service();
        svc.create_session(1, ClientMeta::default()).await.unwrap();
        svc.create_session(1, ClientMeta::default()).await.unwrap();

        let expired_count = svc.revoke_all_for_customer(1).await.unwrap();
        assert_eq!(expired_count, 2);

        let active = svc.repo.list_active_by_customer(1).await.unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn opaque_tokens_have_at_least_128_bits_of_entropy() {
        let svc = service();
        let session = svc.create_session(1, ClientMeta::default()).await.unwrap();
        let decoded = URL_SAFE_NO_PAD.decode(&session.session_token).unwrap();
        assert!(decoded.len() * 8 >= 128);
    }
}
