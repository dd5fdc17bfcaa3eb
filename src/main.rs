use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod metrics;
mod models;
mod notify;
mod seed;
#[cfg(test)]
mod testing;
mod verify;

use crate::config::Config;
use crate::db::{PgCatalog, ProductCatalog};
use crate::metrics::MetricsStore;
use crate::notify::{SmsSender, TwilioClient};
use crate::verify::Verifier;

/// Shared application state — cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ProductCatalog>,
    pub verifier: Arc<Verifier>,
    pub metrics: Arc<RwLock<MetricsStore>>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn ProductCatalog>, sender: Arc<dyn SmsSender>) -> Self {
        let metrics = Arc::new(RwLock::new(MetricsStore::new()));
        Self {
            verifier: Arc::new(Verifier::new(catalog.clone(), sender, metrics.clone())),
            catalog,
            metrics,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,product_verifier=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    // Missing Twilio credentials stop us here, before anything is served.
    let config = Config::from_env()?;
    info!(twilio = ?config.twilio, "Configuration loaded");

    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Database connection pool established.");

    info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations complete.");

    let catalog: Arc<dyn ProductCatalog> = Arc::new(PgCatalog::new(pool));
    if config.seed_on_start {
        seed::seed_products(catalog.as_ref()).await?;
    }

    let sender = Arc::new(TwilioClient::new(config.twilio.clone())?);
    let app = build_router(AppState::new(catalog, sender));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);
    info!("Twilio webhook: POST http://{}/sms/verify", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Incoming SMS ────────────────────────────────────────────────────
        .route("/sms/verify", post(handlers::webhook::receive_sms))

        // ── Catalog fixtures ────────────────────────────────────────────────
        .route("/api/seed", post(handlers::seed::seed_data))

        // ── Observability ───────────────────────────────────────────────────
        .route("/api/metrics", get(handlers::metrics::get_metrics))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::testing::{MemoryCatalog, RecordingSender};

    #[tokio::test]
    async fn health_reports_service_name() {
        let state = AppState::new(
            Arc::new(MemoryCatalog::default()),
            Arc::new(RecordingSender::default()),
        );
        let res = build_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["service"], "product-verifier");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let state = AppState::new(
            Arc::new(MemoryCatalog::default()),
            Arc::new(RecordingSender::default()),
        );
        let res = build_router(state)
            .oneshot(Request::get("/sms/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
