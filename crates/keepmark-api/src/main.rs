//! keepmark-api - HTTP trigger surface for the note export pipeline.
//!
//! One route matters: `/sync` runs a full export batch. A process-wide
//! mutex serializes batches, since they share one git working copy and
//! one export branch. `/` is a liveness probe.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keepmark_core::Config;
use keepmark_inference::OpenAiEnricher;
use keepmark_sync::{GitSink, HttpAttachmentFetcher, KeepClient, SyncEngine};

#[derive(Clone)]
struct AppState {
    engine: Arc<SyncEngine>,
    /// Serializes sync batches; the working copy tolerates one writer.
    batch_lock: Arc<tokio::sync::Mutex<()>>,
}

async fn health() -> &'static str {
    "OK"
}

/// Run one export batch and report how many notes completed.
async fn trigger_sync(State(state): State<AppState>) -> impl IntoResponse {
    let _guard = state.batch_lock.lock().await;

    match state.engine.run().await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "processed_notes": report.processed,
            })),
        ),
        Err(e) => {
            error!("Sync batch failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": e.to_string(),
                })),
            )
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/sync", get(trigger_sync).post(trigger_sync))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "keepmark_api=info,keepmark_sync=info,keepmark_inference=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);
    let source = Arc::new(KeepClient::from_env()?);
    let enricher = Arc::new(OpenAiEnricher::from_env()?);
    let fetcher = Arc::new(HttpAttachmentFetcher::new(
        std::env::var("KEEP_ACCESS_TOKEN").ok(),
    )?);
    let vcs = Arc::new(GitSink::new(&config));

    let engine = SyncEngine::new(config, source, enricher, fetcher, vcs);
    let state = AppState {
        engine: Arc::new(engine),
        batch_lock: Arc::new(tokio::sync::Mutex::new(())),
    };

    let host = std::env::var("KEEPMARK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("KEEPMARK_PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
