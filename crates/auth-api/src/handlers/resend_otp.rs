use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::client_meta;
use crate::response::ApiResponse;
use crate::AppState;
use auth_core::models::otp::OtpType;

#[derive(Debug, Deserialize)]
pub struct ResendOtpRequest {
    pub customer_id: i64,
    #[serde(default = "default_otp_type")]
    pub otp_type: OtpType,
}

fn default_otp_type() -> OtpType {
    OtpType::Mobile
}

#[derive(Debug, Serialize)]
pub struct ResendOtpResponse {
    pub otp_sent: bool,
    pub masked_target: String,
}

/// `POST /api/v1/auth/resend-otp`.
pub async fn resend_otp(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<ResendOtpRequest>,
) -> Result<Json<ApiResponse<ResendOtpResponse>>, ApiError> {
    let (ip, ua) = client_meta(&headers, connect_info);

    let result = state
        .signup
        .resend_otp(req.customer_id, req.otp_type, ip, ua)
        .await?;

    state
        .signup
        .dispatch_resend(req.otp_type, &result.target, &result.code)
        .await;
    info!(customer_id = req.customer_id, "otp resent");

    Ok(Json(ApiResponse::ok(
        "otp resent",
        ResendOtpResponse {
            otp_sent: true,
            masked_target: result.masked_target,
        },
    )))
}
