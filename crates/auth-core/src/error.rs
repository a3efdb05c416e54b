//! Error kinds for the authentication and session core.
//!
//! Every variant maps to a stable `code()` string surfaced to clients; driver
//! text (sqlx, validator) is wrapped rather than exposed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Email already registered")]
    EmailExists,

    #[error("Mobile number already registered")]
    MobileExists,

    #[error("National ID already registered")]
    NationalIdExists,

    #[error("Company fields are required for this account type")]
    CompanyFieldsRequired,

    #[error("Referrer agency not found")]
    ReferrerNotFound,

    #[error("Referrer is not a marketing agency")]
    ReferrerNotAgency,

    #[error("Referrer agency is not active")]
    ReferrerInactive,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token invalid")]
    TokenInvalid,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Account inactive")]
    AccountInactive,

    #[error("User not found")]
    UserNotFound,

    #[error("Password and confirmation do not match")]
    PasswordMismatch,

    #[error("No valid OTP pending for this request")]
    NoValidOtp,

    #[error("Submitted OTP code is incorrect")]
    InvalidOtp,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Dependency failure: {message}")]
    Dependency { message: String },

    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable string code returned to clients, independent of the Rust
    /// variant name or the `Display` message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Validation",
            Self::CustomerNotFound => "CustomerNotFound",
            Self::EmailExists => "EmailExists",
            Self::MobileExists => "MobileExists",
            Self::NationalIdExists => "NationalIdExists",
            Self::CompanyFieldsRequired => "CompanyFieldsRequired",
            Self::ReferrerNotFound => "ReferrerNotFound",
            Self::ReferrerNotAgency => "ReferrerNotAgency",
            Self::ReferrerInactive => "ReferrerInactive",
            Self::TokenExpired => "TokenExpired",
            Self::TokenInvalid => "TokenInvalid",
            Self::TokenRevoked => "TokenRevoked",
            Self::IncorrectPassword => "IncorrectPassword",
            Self::AccountInactive => "AccountInactive",
            Self::UserNotFound => "UserNotFound",
            Self::PasswordMismatch => "PasswordMismatch",
            Self::NoValidOtp => "NoValidOTP",
            Self::InvalidOtp => "InvalidOTP",
            Self::OtpExpired => "OTPExpired",
            Self::Conflict { .. } => "Conflict",
            Self::Dependency { .. } => "Dependency",
            Self::Timeout { .. } => "Timeout",
            Self::Internal(_) => "Internal",
        }
    }

    /// Whether this kind should be surfaced to the caller unchanged (as
    /// opposed to collapsed into a generic 5xx at the edge).
    pub fn is_client_facing(&self) -> bool {
        !matches!(self, Self::Dependency { .. } | Self::Internal(_))
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Dependency {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(err: validator::ValidationErrors) -> Self {
        AuthError::Validation {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_strings() {
        assert_eq!(AuthError::NoValidOtp.code(), "NoValidOTP");
        assert_eq!(AuthError::EmailExists.code(), "EmailExists");
    }

    #[test]
    fn dependency_and_internal_are_not_client_facing() {
        assert!(!AuthError::Dependency {
            message: "down".into()
        }
        .is_client_facing());
        assert!(AuthError::InvalidOtp.is_client_facing());
    }
}
