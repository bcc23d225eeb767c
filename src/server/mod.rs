pub mod admin_users;
pub mod response;

use axum::routing::get;
use axum::{extract::State, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::gateway::{AdminGateway, Gateway};

/// Shared server state: the anon gateway for health checks and, when the
/// service-role credential is configured, the privileged admin gateway.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub admin: Option<AdminGateway>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/admin/users",
            get(admin_users::list)
                .post(admin_users::create)
                .delete(admin_users::remove),
        )
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.gateway.health().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "gateway": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "gateway unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "gateway_error": e.to_string()
                }
            })),
        ),
    }
}
