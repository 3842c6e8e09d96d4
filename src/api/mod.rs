// src/api/mod.rs — Web UI server: one HTML page plus a small JSON API

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::infra::config::{Config, ServerConfig};
use crate::provider::catalog::ModelCatalog;
use crate::studio::{Studio, StudioRun};
pub use types::RunRequest;

/// Per-server UI state. Reset when a valid run starts and filled when it ends.
#[derive(Debug, Default)]
pub struct UiSession {
    pub latest: Option<StudioRun>,
    pub last_error: Option<String>,
}

impl UiSession {
    pub fn reset(&mut self) {
        self.latest = None;
        self.last_error = None;
    }
}

/// Values the page starts with when a request leaves them out.
#[derive(Debug, Clone, Copy)]
pub struct RunDefaults {
    pub creativity: u8,
    pub iterations: u8,
}

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub studio: Arc<Studio>,
    pub catalog: Arc<ModelCatalog>,
    pub defaults: RunDefaults,
    pub session: Arc<Mutex<UiSession>>,
}

impl ApiState {
    pub fn new(studio: Studio, config: &Config) -> Self {
        Self {
            studio: Arc::new(studio),
            catalog: Arc::new(ModelCatalog::from_config(&config.studio)),
            defaults: RunDefaults {
                creativity: config.studio.creativity,
                iterations: config.studio.iterations,
            },
            session: Arc::new(Mutex::new(UiSession::default())),
        }
    }
}

/// Build the axum router with the page and all API routes. The page is
/// served from the same origin, so no CORS headers are added.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/models", get(handlers::list_models))
        .route("/api/v1/runs", post(handlers::create_run))
        .route("/api/v1/runs/latest", get(handlers::latest_run))
        .route("/api/v1/report", get(handlers::download_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("PromptStudio listening on http://{addr}");
    eprintln!("PromptStudio UI: http://{addr}  (Ctrl-C to stop)");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
