//! Transaction boundary (C9), grounded on the `pool.begin()` / `tx.commit()`
//! shape `auth_audit::AuditService` already uses for its own atomic batch
//! writes.
//!
//! `UnitOfWork::run` hands the closure a live `sqlx::Transaction` for
//! statements that must commit or roll back together (e.g. the signup
//! flow's customer insert and its audit row), committing on `Ok` and
//! rolling back on `Err`. Notification dispatch never happens inside the
//! closure -- callers run it afterward, once `run` has returned `Ok`.
//!
//! Lives in `auth-core` rather than `auth-db` because `auth-db`'s
//! repository implementations depend on `auth-core`'s traits; putting the
//! type here instead of there is what lets `SignupFlow`/`LoginFlow` use it
//! without a dependency cycle. `auth-db` re-exports it under its old path.

use sqlx::{MySql, MySqlPool, Transaction};
use std::future::Future;

pub struct UnitOfWork {
    pool: MySqlPool,
}

impl UnitOfWork {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn run<F, Fut, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_, MySql>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;
        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback().await.ok();
                Err(err)
            }
        }
    }
}
