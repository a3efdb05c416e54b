use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use std::net::SocketAddr;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::client_meta;
use crate::response::ApiResponse;
use crate::AppState;
use auth_core::models::customer::CreateCustomerRequest;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub customer_id: i64,
    pub masked_mobile: String,
    pub otp_sent: bool,
}

/// `POST /api/v1/auth/signup`.
pub async fn signup(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<Json<ApiResponse<SignupResponse>>, ApiError> {
    req.validate().map_err(auth_core::AuthError::from)?;
    let (ip, ua) = client_meta(&headers, connect_info);
    let mobile = req.representative_mobile.clone();

    let (result, code) = state.signup.initiate_signup(req, ip, ua).await?;
    info!(customer_id = result.customer_id, "signup initiated");

    state.signup.dispatch_otp(&mobile, &code).await;

    Ok(Json(ApiResponse::ok(
        "signup initiated, verification code sent",
        SignupResponse {
            customer_id: result.customer_id,
            masked_mobile: result.masked_mobile,
            otp_sent: result.otp_sent,
        },
    )))
}
