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
use auth_core::services::session::ClientMeta;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub customer: CustomerView,
    pub tokens: TokenView,
    pub session: SessionView,
}

/// `POST /api/v1/auth/login`.
pub async fn login(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let (ip, ua) = client_meta(&headers, connect_info);
    let meta = ClientMeta {
        ip_address: ip,
        user_agent: ua,
        device_info: serde_json::json!({}),
    };

    let result = state.login.login(&req.identifier, &req.password, meta).await?;
    info!(customer_id = result.customer.id, "login succeeded");

    Ok(Json(ApiResponse::ok(
        "login successful",
        LoginResponse {
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
