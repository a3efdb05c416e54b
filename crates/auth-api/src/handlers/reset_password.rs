use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::client_meta;
use crate::response::{ApiResponse, CustomerView, SessionView, TokenView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub customer_id: i64,
    pub otp_code: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub customer: CustomerView,
    pub tokens: TokenView,
    pub session: SessionView,
}

/// `POST /api/v1/auth/reset`. Revokes every existing session and issues a
/// fresh one, so the caller is left logged in under the new password.
pub async fn reset_password(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<ResetPasswordResponse>>, ApiError> {
    let (ip, ua) = client_meta(&headers, connect_info);

    let result = state
        .login
        .reset_password(
            req.customer_id,
            &req.otp_code,
            &req.new_password,
            &req.confirm_password,
            ip,
            ua,
        )
        .await?;
    info!(customer_id = req.customer_id, "password reset completed");

    Ok(Json(ApiResponse::ok(
        "password reset successful",
        ResetPasswordResponse {
            customer: CustomerView::from(&result.customer),
            tokens: TokenView {
                access_token: result.tokens.access_token,
                refresh_token: result.tokens.refresh_token,
                access_expires_at: result.tokens.access_expires_at,
                refresh_expires_at: result.tokens.refresh_expires_at,
            },
            session: SessionView {
                session_token: result.session_token,
                refresh_token: result.refresh_token,
                expires_at: result.session_expires_at,
            },
        },
    )))
}
