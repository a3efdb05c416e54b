//! The `Customer` entity and the request DTOs that create/describe one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::account_type::AccountTypeKind;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub external_id: Uuid,
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
    pub is_email_verified: bool,
    pub is_mobile_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub mobile_verified_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Mirrors the teacher's `User::can_authenticate` -- a soft-deleted or
    /// administratively disabled customer can never log in, independent of
    /// OTP verification state.
    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }

    pub fn is_fully_verified(&self) -> bool {
        self.is_email_verified && self.is_mobile_verified
    }
}

/// Input DTO for `initiateSignup`. Field-level shape checks live here
/// (`validator::Validate`); uniqueness and cross-field business rules are
/// enforced by the signup flow, not this struct.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    pub account_type: AccountTypeKind,
    #[validate(length(min = 1, max = 100))]
    pub representative_first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub representative_last_name: String,
    pub representative_mobile: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub company_name: Option<String>,
    pub company_national_id: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub company_postal_code: Option<String>,
    pub referrer_agency_code: Option<i64>,
}

impl CreateCustomerRequest {
    pub fn has_all_company_fields(&self) -> bool {
        self.company_name.as_deref().is_some_and(|s| !s.is_empty())
            && self
                .company_national_id
                .as_deref()
                .is_some_and(|s| !s.is_empty())
            && self.company_phone.as_deref().is_some_and(|s| !s.is_empty())
            && self
                .company_address
                .as_deref()
                .is_some_and(|s| !s.is_empty())
            && self
                .company_postal_code
                .as_deref()
                .is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateCustomerRequest {
        CreateCustomerRequest {
            account_type: AccountTypeKind::Individual,
            representative_first_name: "John".into(),
            representative_last_name: "Doe".into(),
            representative_mobile: "+989123456789".into(),
            email: "john@example.com".into(),
            password: "Secret12".into(),
            confirm_password: "Secret12".into(),
            company_name: None,
            company_national_id: None,
            company_phone: None,
            company_address: None,
            company_postal_code: None,
            referrer_agency_code: None,
        }
    }

    #[test]
    fn individual_request_validates_without_company_fields() {
        let req = base_request();
        assert!(req.validate().is_ok());
        assert!(!req.has_all_company_fields());
    }

    #[test]
    fn company_fields_detected_only_when_all_present() {
        let mut req = base_request();
        req.company_name = Some("Acme".into());
        assert!(!req.has_all_company_fields());
        req.company_national_id = Some("123".into());
        req.company_phone = Some("+989000000000".into());
        req.company_address = Some("Tehran".into());
        req.company_postal_code = Some("12345".into());
        assert!(req.has_all_company_fields());
    }
}
