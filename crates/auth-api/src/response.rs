//! The `{success, message, data?}` success envelope and the customer DTO
//! exposed to clients -- never the persistence-layer `Customer`, which
//! carries `password_hash`.

use auth_core::models::account_type::AccountTypeKind;
use auth_core::models::customer::Customer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerView {
    pub id: i64,
    pub external_id: Uuid,
    pub account_type: AccountTypeKind,
    pub representative_first_name: String,
    pub representative_last_name: String,
    pub masked_mobile: String,
    pub masked_email: String,
    pub is_email_verified: bool,
    pub is_mobile_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerView {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            external_id: c.external_id,
            account_type: c.account_type,
            representative_first_name: c.representative_first_name.clone(),
            representative_last_name: c.representative_last_name.clone(),
            masked_mobile: auth_core::masking::mask_mobile(&c.representative_mobile),
            masked_email: auth_core::masking::mask_email(&c.email),
            is_email_verified: c.is_email_verified,
            is_mobile_verified: c.is_mobile_verified,
            is_active: c.is_active,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenView {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}
