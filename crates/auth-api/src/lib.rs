use std::sync::Arc;

use auth_core::services::login::LoginFlow;
use auth_core::services::signup::SignupFlow;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;

/// OpenAPI documentation for the campaign authentication core.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health::health_check),
    tags(
        (name = "Authentication", description = "Signup, OTP verification, login and password recovery"),
        (name = "Health", description = "Service health check")
    ),
    info(
        title = "Campaign Authentication Core API",
        version = "0.1.0",
        description = "Signup, OTP verification, login, password recovery and session/token issuance for the bulk-SMS campaign platform",
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub signup: Arc<SignupFlow>,
    pub login: Arc<LoginFlow>,
}

pub fn app(state: AppState) -> Router {
    router::api_router()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}
