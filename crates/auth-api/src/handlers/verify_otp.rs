use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::client_meta;
use crate::response::{ApiResponse, CustomerView, TokenView};
use crate::AppState;
use auth_core::models::otp::OtpType;
use auth_core::services::session::ClientMeta;

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub customer_id: i64,
    pub otp_code: String,
    pub otp_type: OtpType,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub customer: CustomerView,
    pub tokens: TokenView,
    pub session_token: String,
    pub refresh_token: String,
}

/// `POST /api/v1/auth/verify`.
pub async fn verify_otp(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<ApiResponse<VerifyOtpResponse>>, ApiError> {
    let (ip, ua) = client_meta(&headers, connect_info);
    let meta = ClientMeta {
        ip_address: ip,
        user_agent: ua,
        device_info: serde_json::json!({}),
    };

    let result = state
        .signup
        .verify_otp(req.customer_id, req.otp_type, &req.otp_code, meta)
        .await?;
    info!(customer_id = req.customer_id, "otp verified");

    Ok(Json(ApiResponse::ok(
        "otp verified",
        VerifyOtpResponse {
            customer: CustomerView::from(&result.customer),
            tokens: TokenView {
                access_token: result.tokens.access_token,
                refresh_token: result.tokens.refresh_token,
                access_expires_at: result.tokens.access_expires_at,
                refresh_expires_at: result.tokens.refresh_expires_at,
            },
            session_token: result.session_token,
            refresh_token: result.refresh_token,
        },
    )))
}
