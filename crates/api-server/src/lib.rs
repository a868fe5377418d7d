//! HTTP surface for the hybrid signal engine.

pub mod config;
pub mod signal_routes;

use analysis_orchestrator::{SignalEngine, SignalScreener};
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use fmp_client::FmpClient;
use polygon_client::PolygonClient;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SignalEngine>,
    pub screener: Arc<SignalScreener>,
}

impl AppState {
    pub fn new(engine: Arc<SignalEngine>, screener: SignalScreener) -> Self {
        Self {
            engine,
            screener: Arc::new(screener),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::Internal(err.into())
    }
}

/// Text logs by default; `RUST_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter()).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .merge(signal_routes::signal_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;

    let polygon = Arc::new(PolygonClient::new(config.polygon_config()));
    let fmp = Arc::new(FmpClient::new(config.fmp_config()));

    let engine = Arc::new(SignalEngine::new(polygon, fmp).with_cache_ttl(config.cache_ttl_secs));
    let screener = SignalScreener::new(Arc::clone(&engine), config.watchlist.clone());

    tracing::info!(
        "Watch list: {} symbols, cache TTL {}s",
        config.watchlist.len(),
        config.cache_ttl_secs
    );

    let app = build_router(AppState::new(engine, screener));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Hybrid signal server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
