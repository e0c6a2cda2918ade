use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /health
///
/// 200 while Postgres answers, 503 otherwise, so load balancers stop
/// routing orders to an instance that cannot persist them.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_up = comanda_db::health_check(&state.pool).await.is_ok();
    if !db_up {
        tracing::warn!("Health check: database unreachable");
    }

    let (code, status, database) = if db_up {
        (StatusCode::OK, "ok", "up")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
    };
    (
        code,
        Json(HealthResponse {
            service: env!("CARGO_PKG_NAME"),
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}

/// Health routes, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
