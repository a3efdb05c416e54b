//! Token revocation collaborator.
//!
//! The spec treats revocation as a pluggable contract: an in-process store
//! is acceptable for a single instance, a durable store (here, Redis) is
//! required once more than one instance validates tokens. Either way the
//! only mutable shared state in the process is this store; `DashMap`
//! already shards its internal locking, which stands in for the spec's
//! "many readers, one writer" requirement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use redis::AsyncCommands;
use tracing::{error, warn};

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `token_id` as revoked until `expires_at` (no point keeping it
    /// past the token's own expiry).
    async fn revoke(&self, token_id: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()>;

    async fn is_revoked(&self, token_id: &str) -> anyhow::Result<bool>;
}

#[derive(Default)]
pub struct InMemoryRevocationStore {
    revoked: DashMap<String, DateTime<Utc>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self {
            revoked: DashMap::new(),
        }
    }

    /// Drop entries whose token has already expired; called opportunistically
    /// on writes so the map doesn't grow unbounded.
    fn purge_expired(&self) {
        let now = Utc::now();
        self.revoked.retain(|_, expires_at| *expires_at > now);
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token_id: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        self.purge_expired();
        self.revoked.insert(token_id.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> anyhow::Result<bool> {
        match self.revoked.get(token_id) {
            Some(expires_at) => Ok(*expires_at > Utc::now()),
            None => Ok(false),
        }
    }
}

/// Durable revocation store shared across instances, for deployments that
/// need revocation to survive a process restart or be visible cluster-wide.
pub struct RedisRevocationStore {
    client: redis::Client,
}

impl RedisRevocationStore {
    pub fn new(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    fn key(token_id: &str) -> String {
        format!("revoked:{}", token_id)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, token_id: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        let ttl = (expires_at - Utc::now()).num_seconds().max(1) as u64;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(Self::key(token_id), "1", ttl).await?;
        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> anyhow::Result<bool> {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Redis connection error checking revocation: {}", e);
                return Err(e.into());
            }
        };
        let exists: bool = conn.exists(Self::key(token_id)).await?;
        Ok(exists)
    }
}

/// Permitted only for single-instance deployments: always reports "not
/// revoked", matching the design-note stub the spec names.
#[derive(Default)]
pub struct NullRevocationStore;

#[async_trait]
impl RevocationStore for NullRevocationStore {
    async fn revoke(&self, _token_id: &str, _expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        warn!("NullRevocationStore: revoke() is a no-op, only valid for single-instance deployments");
        Ok(())
    }

    async fn is_revoked(&self, _token_id: &str) -> anyhow::Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn revoked_token_is_reported_revoked() {
        let store = InMemoryRevocationStore::new();
        let expires_at = Utc::now() + chrono::Duration::minutes(5);

        assert!(!store.is_revoked("jti-1").await.unwrap());
        store.revoke("jti-1", expires_at).await.unwrap();
        assert!(store.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn expired_revocation_entry_is_treated_as_not_revoked() {
        let store = InMemoryRevocationStore::new();
        let already_expired = Utc::now() - chrono::Duration::minutes(1);

        store.revoke("jti-2", already_expired).await.unwrap();
        assert!(!store.is_revoked("jti-2").await.unwrap());
    }

    #[tokio::test]
    async fn null_store_never_reports_revoked() {
        let store = NullRevocationStore;
        store
            .revoke("jti-3", Utc::now() + chrono::Duration::minutes(1))
            .await
            .unwrap();
        assert!(!store.is_revoked("jti-3").await.unwrap());
    }
}
