//! `CustomerRepository` (C1): the `customers` table, grounded on the
//! teacher's `UserRepository` (`query`/`try_get` row mapping, one method
//! per contract operation, sqlx runtime-checked queries throughout).

use async_trait::async_trait;
use auth_core::error::AuthError;
use auth_core::models::account_type::AccountTypeKind;
use auth_core::models::customer::Customer;
use auth_core::models::otp::OtpType;
use auth_core::repository::{CustomerFilter, CustomerRepository as CustomerRepositoryContract, NewCustomer, Pagination};
use chrono::Utc;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct CustomerRepository {
    pool: MySqlPool,
}

impl CustomerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn map_row(row: sqlx::mysql::MySqlRow) -> Result<Customer, sqlx::Error> {
        let external_id_str: String = row.try_get("external_id")?;
        Ok(Customer {
            id: row.try_get("id")?,
            external_id: Uuid::parse_str(&external_id_str).unwrap_or_else(|_| Uuid::new_v4()),
            agency_referer_code: row.try_get("agency_referer_code")?,
            account_type_id: row.try_get("account_type_id")?,
            account_type: row.try_get("account_type")?,
            company_name: row.try_get("company_name")?,
            company_national_id: row.try_get("company_national_id")?,
            company_phone: row.try_get("company_phone")?,
            company_address: row.try_get("company_address")?,
            company_postal_code: row.try_get("company_postal_code")?,
            representative_first_name: row.try_get("representative_first_name")?,
            representative_last_name: row.try_get("representative_last_name")?,
            representative_mobile: row.try_get("representative_mobile")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            referrer_agency_id: row.try_get("referrer_agency_id")?,
            is_email_verified: row.try_get("is_email_verified")?,
            is_mobile_verified: row.try_get("is_mobile_verified")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            email_verified_at: row.try_get("email_verified_at")?,
            mobile_verified_at: row.try_get("mobile_verified_at")?,
            last_login_at: row.try_get("last_login_at")?,
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        id, external_id, agency_referer_code, account_type_id, account_type,
        company_name, company_national_id, company_phone, company_address, company_postal_code,
        representative_first_name, representative_last_name, representative_mobile, email,
        password_hash, referrer_agency_id, is_email_verified, is_mobile_verified, is_active,
        created_at, updated_at, email_verified_at, mobile_verified_at, last_login_at
    "#;
}

#[async_trait]
impl CustomerRepositoryContract for CustomerRepository {
    async fn save(&self, new: NewCustomer) -> Result<Customer, AuthError> {
        let external_id = Uuid::new_v4();
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                external_id, agency_referer_code, account_type_id, account_type,
                company_name, company_national_id, company_phone, company_address, company_postal_code,
                representative_first_name, representative_last_name, representative_mobile, email,
                password_hash, referrer_agency_id, is_email_verified, is_mobile_verified, is_active,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, false, false, true, ?, ?)
            "#,
        )
        .bind(external_id.to_string())
        .bind(new.agency_referer_code)
        .bind(new.account_type_id)
        .bind(new.account_type)
        .bind(&new.company_name)
        .bind(&new.company_national_id)
        .bind(&new.company_phone)
        .bind(&new.company_address)
        .bind(&new.company_postal_code)
        .bind(&new.representative_first_name)
        .bind(&new.representative_last_name)
        .bind(&new.representative_mobile)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.referrer_agency_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.by_id(id).await?.ok_or(AuthError::CustomerNotFound)
    }

    async fn save_in(
        &self,
        new: NewCustomer,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<Customer, AuthError> {
        let external_id = Uuid::new_v4();
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                external_id, agency_referer_code, account_type_id, account_type,
                company_name, company_national_id, company_phone, company_address, company_postal_code,
                representative_first_name, representative_last_name, representative_mobile, email,
                password_hash, referrer_agency_id, is_email_verified, is_mobile_verified, is_active,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, false, false, true, ?, ?)
            "#,
        )
        .bind(external_id.to_string())
        .bind(new.agency_referer_code)
        .bind(new.account_type_id)
        .bind(new.account_type)
        .bind(&new.company_name)
        .bind(&new.company_national_id)
        .bind(&new.company_phone)
        .bind(&new.company_address)
        .bind(&new.company_postal_code)
        .bind(&new.representative_first_name)
        .bind(&new.representative_last_name)
        .bind(&new.representative_mobile)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.referrer_agency_id)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        let id = result.last_insert_id() as i64;
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(Self::map_row)
            .transpose()
            .map_err(AuthError::from)?
            .ok_or(AuthError::CustomerNotFound)
    }

    async fn by_id(&self, id: i64) -> Result<Option<Customer>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn by_filter(
        &self,
        filter: &CustomerFilter,
        pagination: Pagination,
    ) -> Result<Vec<Customer>, AuthError> {
        // Dynamic filters are built as a small fixed set of optional equality
        // clauses; the filter surface here is narrow enough that a query
        // builder would be overkill.
        let mut clauses = Vec::new();
        if filter.id.is_some() {
            clauses.push("id = ?");
        }
        if filter.email.is_some() {
            clauses.push("email = ?");
        }
        if filter.representative_mobile.is_some() {
            clauses.push("representative_mobile = ?");
        }
        if filter.company_national_id.is_some() {
            clauses.push("company_national_id = ?");
        }
        if filter.agency_referer_code.is_some() {
            clauses.push("agency_referer_code = ?");
        }
        if filter.account_type.is_some() {
            clauses.push("account_type = ?");
        }
        if filter.is_active.is_some() {
            clauses.push("is_active = ?");
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let limit = if pagination.limit == 0 {
            u32::MAX as i64
        } else {
            pagination.limit as i64
        };

        let sql = format!(
            "SELECT {} FROM customers {} ORDER BY id LIMIT ? OFFSET ?",
            Self::SELECT_COLUMNS,
            where_clause
        );
        let mut query = sqlx::query(&sql);
        if let Some(v) = filter.id {
            query = query.bind(v);
        }
        if let Some(v) = &filter.email {
            query = query.bind(v.clone());
        }
        if let Some(v) = &filter.representative_mobile {
            query = query.bind(v.clone());
        }
        if let Some(v) = &filter.company_national_id {
            query = query.bind(v.clone());
        }
        if let Some(v) = filter.agency_referer_code {
            query = query.bind(v);
        }
        if let Some(v) = filter.account_type {
            query = query.bind(v);
        }
        if let Some(v) = filter.is_active {
            query = query.bind(v);
        }
        query = query.bind(limit).bind(pagination.offset as i64);

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(Self::map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AuthError::from)
    }

    async fn count(&self, filter: &CustomerFilter) -> Result<u64, AuthError> {
        Ok(self
            .by_filter(filter, Pagination::default())
            .await?
            .len() as u64)
    }

    async fn exists(&self, filter: &CustomerFilter) -> Result<bool, AuthError> {
        Ok(!self
            .by_filter(
                filter,
                Pagination {
                    limit: 1,
                    offset: 0,
                },
            )
            .await?
            .is_empty())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE email = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<Customer>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE representative_mobile = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(mobile)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Customer>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE company_national_id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(national_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn find_by_agency_code(&self, code: i64) -> Result<Option<Customer>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE agency_referer_code = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::map_row).transpose().map_err(AuthError::from)
    }

    async fn mark_verified(&self, id: i64, otp_type: OtpType) -> Result<Customer, AuthError> {
        let now = Utc::now();
        match otp_type {
            OtpType::Mobile | OtpType::PasswordReset => {
                sqlx::query(
                    "UPDATE customers SET is_mobile_verified = true, mobile_verified_at = ?, updated_at = ? WHERE id = ?",
                )
                .bind(now)
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
            OtpType::Email => {
                sqlx::query(
                    "UPDATE customers SET is_email_verified = true, email_verified_at = ?, updated_at = ? WHERE id = ?",
                )
                .bind(now)
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
        }
        self.by_id(id).await?.ok_or(AuthError::CustomerNotFound)
    }

    async fn mark_verified_in(
        &self,
        id: i64,
        otp_type: OtpType,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<Customer, AuthError> {
        let now = Utc::now();
        match otp_type {
            OtpType::Mobile | OtpType::PasswordReset => {
                sqlx::query(
                    "UPDATE customers SET is_mobile_verified = true, mobile_verified_at = ?, updated_at = ? WHERE id = ?",
                )
                .bind(now)
                .bind(now)
                .bind(id)
                .execute(&mut **tx)
                .await?;
            }
            OtpType::Email => {
                sqlx::query(
                    "UPDATE customers SET is_email_verified = true, email_verified_at = ?, updated_at = ? WHERE id = ?",
                )
                .bind(now)
                .bind(now)
                .bind(id)
                .execute(&mut **tx)
                .await?;
            }
        }
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE id = ?",
            Self::SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(Self::map_row)
            .transpose()
            .map_err(AuthError::from)?
            .ok_or(AuthError::CustomerNotFound)
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE customers SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_password_hash_in(
        &self,
        id: i64,
        password_hash: &str,
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    ) -> Result<(), AuthError> {
        sqlx::query("UPDATE customers SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn record_login(&self, id: i64) -> Result<(), AuthError> {
        sqlx::query("UPDATE customers SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Seed-row lookup (`account_types`), read-only after bootstrap.
#[derive(Clone)]
pub struct AccountTypeRepository {
    pool: MySqlPool,
}

impl AccountTypeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl auth_core::repository::AccountTypeRepository for AccountTypeRepository {
    async fn id_for_kind(&self, kind: AccountTypeKind) -> Result<i64, AuthError> {
        let id: i64 = sqlx::query_scalar("SELECT id FROM account_types WHERE kind = ?")
            .bind(kind)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }
}
