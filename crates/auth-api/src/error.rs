//! Maps `AuthError` onto the `{success, message, data?, error?}` envelope
//! every response in this crate uses (see `crate::response::ApiResponse`).
//! Driver text never reaches the client -- dependency/internal errors
//! collapse to a generic 500 message, everything else is surfaced as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use auth_core::error::AuthError;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub error: ErrorBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

pub struct ApiError {
    pub inner: AuthError,
    pub request_id: Option<Uuid>,
}

impl ApiError {
    pub fn new(error: AuthError) -> Self {
        Self {
            inner: error,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }

    fn status(&self) -> StatusCode {
        match &self.inner {
            AuthError::Validation { .. } | AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
            AuthError::CustomerNotFound | AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailExists
            | AuthError::MobileExists
            | AuthError::NationalIdExists
            | AuthError::Conflict { .. } => StatusCode::CONFLICT,
            AuthError::CompanyFieldsRequired
            | AuthError::ReferrerNotFound
            | AuthError::ReferrerNotAgency
            | AuthError::ReferrerInactive => StatusCode::BAD_REQUEST,
            AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::TokenRevoked
            | AuthError::IncorrectPassword
            | AuthError::AccountInactive
            | AuthError::NoValidOtp
            | AuthError::InvalidOtp
            | AuthError::OtpExpired => StatusCode::UNAUTHORIZED,
            AuthError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AuthError::Dependency { .. } | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Dependency/internal failures never leak driver text to clients
        // (§7); everything else surfaces its own message unchanged.
        let (code, message) = if self.inner.is_client_facing() {
            (self.inner.code().to_string(), self.inner.to_string())
        } else {
            tracing::error!(error = %self.inner, "internal error surfaced to client as opaque 500");
            ("Internal".to_string(), "An internal error occurred".to_string())
        };

        let body = ErrorEnvelope {
            success: false,
            message,
            error: ErrorBody { code, details: None },
            request_id: self.request_id.map(|id| id.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(inner: AuthError) -> Self {
        ApiError::new(inner)
    }
}
