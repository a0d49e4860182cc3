use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Readiness of a service: `200` when the database answers a ping,
/// `503` otherwise.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let start = Instant::now();
    let db_result = crate::db::check_connection(&state.db).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match db_result {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "service": state.service_name,
                "version": env!("CARGO_PKG_VERSION"),
                "checks": { "database": { "status": "up", "latency_ms": latency_ms } },
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "DOWN",
                "service": state.service_name,
                "version": env!("CARGO_PKG_VERSION"),
                "checks": { "database": { "status": "down", "error": e.to_string() } },
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        ),
    }
}

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
