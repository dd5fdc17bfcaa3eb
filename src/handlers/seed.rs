use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{error::AppResult, seed, AppState};

// ── POST /api/seed ────────────────────────────────────────────────────────────

pub async fn seed_data(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let seeded = seed::seed_products(state.catalog.as_ref()).await?;
    let seed_elapsed = start.elapsed();

    let total_in_db = state.catalog.count().await?;

    info!(seeded, total_in_db, seed_ms = seed_elapsed.as_millis(), "Seed request done");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "seeded": seeded,
            "total_in_db": total_in_db,
            "seed_time_ms": seed_elapsed.as_secs_f64() * 1000.0,
        })),
    ))
}
