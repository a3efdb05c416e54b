pub mod forgot_password;
pub mod health;
pub mod login;
pub mod reset_password;
pub mod resend_otp;
pub mod signup;
pub mod verify_otp;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Pulls the caller's IP/user-agent out of the request for audit rows and
/// session metadata. The edge (load balancer/proxy) is expected to forward
/// the real client IP via `x-forwarded-for`; `ConnectInfo` is the fallback
/// for a direct connection.
pub fn client_meta(
    headers: &HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()));

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    (ip, user_agent)
}
