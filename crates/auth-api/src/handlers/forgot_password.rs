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

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub customer_id: i64,
    pub masked_mobile: String,
}

/// `POST /api/v1/auth/forgot-password`.
pub async fn forgot_password(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<ForgotPasswordResponse>>, ApiError> {
    let (ip, ua) = client_meta(&headers, connect_info);

    let (result, code) = state.login.forgot_password(&req.identifier, ip, ua).await?;
    info!(customer_id = result.customer_id, "password reset otp issued");

    state.signup.dispatch_otp(&result.mobile, &code).await;

    Ok(Json(ApiResponse::ok(
        "password reset code sent",
        ForgotPasswordResponse {
            customer_id: result.customer_id,
            masked_mobile: result.masked_mobile,
        },
    )))
}
