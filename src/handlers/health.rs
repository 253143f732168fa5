use crate::AppState;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use sea_orm::ConnectionTrait;
use serde_json::json;

/// Liveness: the process is up.
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness: the database answers a trivial query.
async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state
        .db
        .execute_unprepared("SELECT 1")
        .await
        .is_ok();
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
}
