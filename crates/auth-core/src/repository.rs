//! Repository layer (C1): per-entity contracts with the uniform shape
//! spec §4.1 names (`save`/`byID`/`byFilter`/`count`/`exists`), plus the
//! typed lookups signup/login need. Mirrors the teacher's `UserStore`
//! trait (`services/identity.rs`) -- an `async_trait` interface
//! implemented against `sqlx` in `auth-db`, with an in-memory double for
//! flow-level tests.
//!
//! `OtpRepository` and `SessionRepository` live next to their engines in
//! `services::otp` / `services::session`; this module holds only the
//! customer-facing contract and the filter/pagination types shared across
//! all four repositories.

use async_trait::async_trait;

use crate::error::AuthError;
use crate::models::account_type::AccountTypeKind;
use crate::models::customer::Customer;
use crate::models::otp::OtpType;

/// `limit=0` means "no limit"; `offset=0` means "from the start" -- same
/// convention spec §4.1 names.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

/// A `None` field is a wildcard; `Some` is an equality constraint.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub representative_mobile: Option<String>,
    pub company_national_id: Option<String>,
    pub agency_referer_code: Option<i64>,
    pub account_type: Option<AccountTypeKind>,
    pub is_active: Option<bool>,
}

/// Fields required to persist a new customer row; `id`/`external_id`/
/// timestamps/verification flags are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub agency_referer_code: i64,
    pub account_type_id: i64,
    pub account_type: AccountTypeKind,
    pub company_name: Option<String>,
    pub company_national_id: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub company_postal_code: Option<String>,
    pub representative_first_name: String,
    pub representative_last_name: String,
    pub representative_mobile: String,
    pub email: String,
    pub password_hash: String,
    pub referrer_agency_id: Option<i64>,
}

/// Read-only after bootstrap: resolves a seed `AccountTypeKind` to its
/// surrogate id.
#[async_trait]
pub trait AccountTypeRepository: Send + Sync {
    async fn id_for_kind(&self, kind: AccountTypeKind) -> Result<i64, AuthError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn save(&self, new: NewCustomer) -> Result<Customer, AuthError>;
    /// Same as `save`, scoped to an already-open transaction so the insert
    /// commits or rolls back with the caller's other writes.
    async fn save_in(
        &self,
        new: NewCustomer,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<Customer, AuthError>;
    async fn by_id(&self, id: i64) -> Result<Option<Customer>, AuthError>;
    async fn by_filter(
        &self,
        filter: &CustomerFilter,
        pagination: Pagination,
    ) -> Result<Vec<Customer>, AuthError>;
    async fn count(&self, filter: &CustomerFilter) -> Result<u64, AuthError>;
    async fn exists(&self, filter: &CustomerFilter) -> Result<bool, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AuthError>;
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<Customer>, AuthError>;
    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Customer>, AuthError>;
    async fn find_by_agency_code(&self, code: i64) -> Result<Option<Customer>, AuthError>;

    /// Flips `is_mobile_verified` or `is_email_verified` (per `otp_type`)
    /// and sets the matching `*_verified_at`. Returns the updated row.
    async fn mark_verified(&self, id: i64, otp_type: OtpType) -> Result<Customer, AuthError>;
    async fn mark_verified_in(
        &self,
        id: i64,
        otp_type: OtpType,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<Customer, AuthError>;
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), AuthError>;
    async fn update_password_hash_in(
        &self,
        id: i64,
        password_hash: &str,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<(), AuthError>;
    async fn record_login(&self, id: i64) -> Result<(), AuthError>;
}
