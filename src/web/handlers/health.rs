use axum::{extract::State, Json};

use crate::services::HealthReport;
use crate::web::AppState;

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.lookup.health().await)
}
