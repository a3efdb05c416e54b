//! OTP engine (C4): issue and verify six-digit codes over an append-only
//! correlation chain. Generalizes the teacher's `OtpService`
//! (`OtpPurpose`-keyed, `verified_at: Option<DateTime<Utc>>` in-place
//! mutation) to the closed `OtpType` this platform needs and the
//! history-preserving successor-row model spec §3/§9 requires.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::error::AuthError;
use crate::models::otp::{NewOtpVerification, OtpStatus, OtpType, OtpVerification};

#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Idempotent: appends an `expired` successor for every currently
    /// pending row matching `(customer_id, otp_type)`. Calling it with
    /// nothing pending is a no-op.
    async fn expire_old(&self, customer_id: i64, otp_type: OtpType) -> Result<(), AuthError>;
    async fn insert_pending(
        &self,
        new: NewOtpVerification,
    ) -> Result<OtpVerification, AuthError>;
    /// Same as `insert_pending`, scoped to an already-open transaction.
    async fn insert_pending_in(
        &self,
        new: NewOtpVerification,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<OtpVerification, AuthError>;
    async fn latest_pending(
        &self,
        customer_id: i64,
        otp_type: OtpType,
    ) -> Result<Option<OtpVerification>, AuthError>;
    /// Appends a new row sharing `previous.correlation_id` with the given
    /// terminal status. Never mutates `previous`.
    async fn append_successor(
        &self,
        previous: &OtpVerification,
        status: OtpStatus,
        attempts_count: i32,
    ) -> Result<OtpVerification, AuthError>;
    async fn history_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> Result<Vec<OtpVerification>, AuthError>;
}

pub struct OtpEngine {
    repo: Arc<dyn OtpRepository>,
    ttl: Duration,
    max_attempts: i32,
}

impl OtpEngine {
    pub fn new(repo: Arc<dyn OtpRepository>, ttl_minutes: i64, max_attempts: i32) -> Self {
        Self {
            repo,
            ttl: Duration::minutes(ttl_minutes),
            max_attempts,
        }
    }

    pub fn generate_code() -> String {
        let code: u32 = rand::thread_rng().gen_range(0..=999_999);
        format!("{:06}", code)
    }

    /// Steps 1-2 of §4.4; dispatch (step 3) is the caller's job, performed
    /// outside the surrounding transaction.
    pub async fn issue(
        &self,
        customer_id: i64,
        otp_type: OtpType,
        target_value: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<(OtpVerification, String), AuthError> {
        self.repo.expire_old(customer_id, otp_type).await?;

        let code = Self::generate_code();
        let row = self
            .repo
            .insert_pending(NewOtpVerification {
                correlation_id: Uuid::new_v4(),
                customer_id,
                otp_type,
                target_value: target_value.to_string(),
                otp_code: code.clone(),
                max_attempts: self.max_attempts,
                expires_at: Utc::now() + self.ttl,
                ip_address,
                user_agent,
            })
            .await?;

        Ok((row, code))
    }

    /// Same as `issue`, for callers that must insert the pending row inside
    /// an already-open transaction (the signup flow's customer insert).
    /// Skips `expire_old`: a customer this flow just inserted can't already
    /// have a pending row.
    pub async fn issue_in(
        &self,
        customer_id: i64,
        otp_type: OtpType,
        target_value: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<(OtpVerification, String), AuthError> {
        let code = Self::generate_code();
        let row = self
            .repo
            .insert_pending_in(
                NewOtpVerification {
                    correlation_id: Uuid::new_v4(),
                    customer_id,
                    otp_type,
                    target_value: target_value.to_string(),
                    otp_code: code.clone(),
                    max_attempts: self.max_attempts,
                    expires_at: Utc::now() + self.ttl,
                    ip_address,
                    user_agent,
                },
                tx,
            )
            .await?;

        Ok((row, code))
    }

    /// The five-step verify sequence. `terminal_on_success` lets callers
    /// choose `verified` (signup) vs `used` (password reset) without the
    /// engine knowing which flow called it.
    pub async fn verify(
        &self,
        customer_id: i64,
        otp_type: OtpType,
        submitted_code: &str,
        terminal_on_success: OtpStatus,
    ) -> Result<OtpVerification, AuthError> {
        let pending = self
            .repo
            .latest_pending(customer_id, otp_type)
            .await?
            .ok_or(AuthError::NoValidOtp)?;

        if !pending.is_consumable() {
            return Err(AuthError::NoValidOtp);
        }

        if submitted_code != pending.otp_code {
            self.repo
                .append_successor(&pending, OtpStatus::Failed, pending.attempts_count + 1)
                .await?;
            return Err(AuthError::InvalidOtp);
        }

        self.repo
            .append_successor(&pending, terminal_on_success, pending.attempts_count)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryOtpRepository {
        rows: Mutex<Vec<OtpVerification>>,
        next_id: Mutex<i64>,
    }

    #[async_trait]
    impl OtpRepository for InMemoryOtpRepository {
        async fn expire_old(&self, customer_id: i64, otp_type: OtpType) -> Result<(), AuthError> {
            let pending: Vec<OtpVerification> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.customer_id == customer_id
                        && r.otp_type == otp_type
                        && r.status == OtpStatus::Pending
                })
                .cloned()
                .collect();
            for row in pending {
                self.append_successor(&row, OtpStatus::Expired, row.attempts_count)
                    .await?;
            }
            Ok(())
        }

        async fn insert_pending(
            &self,
            new: NewOtpVerification,
        ) -> Result<OtpVerification, AuthError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let row = OtpVerification {
                id: *next_id,
                correlation_id: new.correlation_id,
                customer_id: new.customer_id,
                otp_type: new.otp_type,
                target_value: new.target_value,
                otp_code: new.otp_code,
                status: OtpStatus::Pending,
                attempts_count: 0,
                max_attempts: new.max_attempts,
                expires_at: new.expires_at,
                ip_address: new.ip_address,
                user_agent: new.user_agent,
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn insert_pending_in(
            &self,
            new: NewOtpVerification,
            _tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        ) -> Result<OtpVerification, AuthError> {
            self.insert_pending(new).await
        }

        async fn latest_pending(
            &self,
            customer_id: i64,
            otp_type: OtpType,
        ) -> Result<Option<OtpVerification>, AuthError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|r| {
                    r.customer_id == customer_id
                        && r.otp_type == otp_type
                        && r.status == OtpStatus::Pending
                })
                .cloned())
        }

        async fn append_successor(
            &self,
            previous: &OtpVerification,
            status: OtpStatus,
            attempts_count: i32,
        ) -> Result<OtpVerification, AuthError> {
            let mut rows = self.rows.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let successor = OtpVerification {
                id: *next_id,
                status,
                attempts_count,
                ..previous.clone()
            };
            rows.push(successor.clone());
            Ok(successor)
        }

        async fn history_by_correlation(
            &self,
            correlation_id: Uuid,
        ) -> Result<Vec<OtpVerification>, AuthError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.correlation_id == correlation_id)
                .cloned()
                .collect())
        }
    }

    fn engine() -> OtpEngine {
        OtpEngine::new(Arc::new(InMemoryOtpRepository::default()), 5, 3)
    }

    #[tokio::test]
    async fn issue_then_verify_with_correct_code_succeeds() {
        let engine = engine();
        let (_row, code) = engine
            .issue(1, OtpType::Mobile, "+989123456789", None, None)
            .await
            .unwrap();

        let verified = engine
            .verify(1, OtpType::Mobile, &code, OtpStatus::Verified)
            .await
            .unwrap();
        assert_eq!(verified.status, OtpStatus::Verified);
    }

    #[tokio::test]
    async fn three_wrong_codes_then_correct_code_still_fails() {
        let engine = engine();
        let (_row, code) = engine
            .issue(1, OtpType::Mobile, "+989123456789", None, None)
            .await
            .unwrap();

        for expected_attempts in 1..=3 {
            let err = engine
                .verify(1, OtpType::Mobile, "000000", OtpStatus::Verified)
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidOtp));
            let _ = expected_attempts;
        }

        // Attempts exhausted: even the correct code now yields NoValidOTP.
        let err = engine
            .verify(1, OtpType::Mobile, &code, OtpStatus::Verified)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NoValidOtp));
    }

    #[tokio::test]
    async fn issuing_again_expires_the_previous_pending_row() {
        let engine = engine();
        let (first, _) = engine
            .issue(1, OtpType::Mobile, "+989123456789", None, None)
            .await
            .unwrap();
        engine
            .issue(1, OtpType::Mobile, "+989123456789", None, None)
            .await
            .unwrap();

        let history = engine
            .repo
            .history_by_correlation(first.correlation_id)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].status, OtpStatus::Expired);
    }

    #[tokio::test]
    async fn expire_old_is_idempotent() {
        let engine = engine();
        engine
            .issue(1, OtpType::Mobile, "+989123456789", None, None)
            .await
            .unwrap();
        engine.repo.expire_old(1, OtpType::Mobile).await.unwrap();
        let before = engine.repo.rows.lock().unwrap().len();
        engine.repo.expire_old(1, OtpType::Mobile).await.unwrap();
        let after = engine.repo.rows.lock().unwrap().len();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn attempts_count_is_monotonically_non_decreasing_along_the_chain() {
        let engine = engine();
        let (first, _) = engine
            .issue(1, OtpType::Mobile, "+989123456789", None, None)
            .await
            .unwrap();
        engine
            .verify(1, OtpType::Mobile, "000000", OtpStatus::Verified)
            .await
            .unwrap_err();
        engine
            .verify(1, OtpType::Mobile, "000001", OtpStatus::Verified)
            .await
            .unwrap_err();

        let history = engine
            .repo
            .history_by_correlation(first.correlation_id)
            .await
            .unwrap();
        let attempts: Vec<i32> = history.iter().map(|r| r.attempts_count).collect();
        assert!(attempts.windows(2).all(|w| w[1] >= w[0]));
    }
}
