use axum::{extract::State, http::StatusCode, Json};

use crate::AppState;

const RECENT_FAILURES: usize = 20;

// ── GET /api/metrics ──────────────────────────────────────────────────────────

pub async fn get_metrics(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let metrics = state.metrics.read().await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "entries": metrics.entries.len(),
            "recorded": metrics.recorded(),
            "delivery_failures": metrics.failures(),
            "aggregated": metrics.aggregated(),
            "recent_failures": metrics.recent_failures(RECENT_FAILURES),
        })),
    )
}
