use axum::{middleware, routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{forgot_password, health, login, resend_otp, reset_password, signup, verify_otp};
use crate::middleware::request_id_middleware;
use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", axum::routing::get(health::health_check))
        .route("/api/v1/auth/signup", post(signup::signup))
        .route("/api/v1/auth/verify", post(verify_otp::verify_otp))
        .route("/api/v1/auth/resend-otp", post(resend_otp::resend_otp))
        .route("/api/v1/auth/login", post(login::login))
        .route(
            "/api/v1/auth/forgot-password",
            post(forgot_password::forgot_password),
        )
        .route("/api/v1/auth/reset", post(reset_password::reset_password))
        // Executed bottom-to-top: request id is stamped before tracing spans
        // pick it up.
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
