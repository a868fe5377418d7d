//! Signal API Routes
//!
//! Single-symbol signal, watch-list screen, candle passthrough and health.

use analysis_core::{AnalysisError, CandleSeries, ScreenEntry, Signal};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppError, AppState};

pub const DEFAULT_SYMBOL: &str = "AAPL";
const MAX_SYMBOL_LEN: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    #[serde(default)]
    pub symbol: Option<String>,
}

pub fn signal_routes() -> Router<AppState> {
    Router::new()
        .route("/hybrid-signal", get(hybrid_signal))
        .route("/screener", get(screener))
        .route("/candle-data", get(candle_data))
        .route("/health", get(health))
}

/// Trim and upper-case a ticker, falling back to `AAPL` when absent.
pub fn normalize_symbol(raw: Option<&str>) -> Result<String, AppError> {
    let symbol = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_uppercase(),
        _ => return Ok(DEFAULT_SYMBOL.to_string()),
    };

    let valid = symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-');

    if !valid {
        return Err(AppError::BadRequest(format!("Invalid symbol: {}", symbol)));
    }
    Ok(symbol)
}

async fn hybrid_signal(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<Signal>, AppError> {
    let symbol = normalize_symbol(query.symbol.as_deref())?;
    Ok(Json(state.engine.evaluate(&symbol).await))
}

async fn screener(State(state): State<AppState>) -> Json<Vec<ScreenEntry>> {
    Json(state.screener.screen().await)
}

async fn candle_data(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<Response, AppError> {
    let symbol = normalize_symbol(query.symbol.as_deref())?;

    match state.engine.candles(&symbol).await {
        Ok(series) => Ok(Json::<CandleSeries>(series).into_response()),
        Err(AnalysisError::NoData(detail)) => {
            tracing::info!("No candle data for {}: {}", symbol, detail);
            Ok(Json(json!({ "error": "No data" })).into_response())
        }
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(e))),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
