use axum::extract::State;
use axum::{routing::get, Json, Router};
use medrec_db::repositories::RecordRepo;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the store answers, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Stored records, or `null` when the count query fails.
    pub record_count: Option<i64>,
}

/// GET /health -- store reachability and record count. Not gated.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = medrec_db::health_check(&state.pool).await.is_ok();

    let record_count = if db_healthy {
        RecordRepo::count(&state.pool)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "Record count failed"))
            .ok()
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        record_count,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
