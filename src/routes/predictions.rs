use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::auth;
use crate::db::prediction_queries::{self, DEFAULT_LIMIT, MAX_LIMIT};
use crate::errors::AppError;
use crate::models::CreatePredictionRequest;
use crate::services::analytics::{self, SignalFilter};
use crate::services::ingestion;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(save))
        .route("/stats", get(stats))
}

/// Write paths that go through the external predictor, mounted at
/// `/api/predict`.
pub fn predict_router() -> Router<AppState> {
    Router::new()
        .route("/", post(predict_one))
        .route("/batch", post(predict_batch))
}

// ==============================================================================
// Query Parameters / Bodies
// ==============================================================================

#[derive(Debug, Deserialize)]
struct ListParams {
    symbol: Option<String>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StatsParams {
    symbol: Option<String>,
    signal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct BatchPredictRequest {
    symbols: Vec<String>,
}

// ==============================================================================
// Read Handlers
// ==============================================================================

async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let limit = match params.limit {
        Some(l) if l <= 0 => {
            return Err(AppError::Validation(
                "limit must be a positive integer".to_string(),
            ))
        }
        Some(l) => l.min(MAX_LIMIT),
        None => DEFAULT_LIMIT,
    };

    // Exact-match filter, upper-cased like everything else
    let symbol = params
        .symbol
        .as_deref()
        .and_then(|s| ingestion::normalize_symbol(s).ok());

    let predictions =
        prediction_queries::list_predictions(&state.pool, user_id, symbol.as_deref(), limit)
            .await?;

    info!("📋 Returning {} predictions for user {}", predictions.len(), user_id);
    Ok(Json(predictions))
}

async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<StatsParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let signal = SignalFilter::from_param(params.signal.as_deref()).ok_or_else(|| {
        AppError::Validation("signal must be BUY, SELL, NO_TRADE or ALL".to_string())
    })?;

    let predictions =
        prediction_queries::list_predictions(&state.pool, user_id, None, MAX_LIMIT).await?;

    let filtered =
        analytics::filter_predictions(&predictions, params.symbol.as_deref(), signal);
    Ok(Json(analytics::compute_stats(&filtered)))
}

// ==============================================================================
// Write Handlers
// ==============================================================================

/// Direct save of an already-obtained prediction (the dashboard posts the
/// predictor's response back after rendering it).
async fn save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePredictionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    if !(0.0..=1.0).contains(&req.confidence) {
        return Err(AppError::Validation(
            "confidence must be between 0 and 1".to_string(),
        ));
    }

    let symbol = ingestion::normalize_symbol(&req.symbol)?;
    let row = prediction_queries::create_prediction(
        &state.pool,
        user_id,
        &symbol,
        req.prediction.as_str(),
        req.confidence,
        req.signal.as_str(),
    )
    .await?;

    Ok(Json(row))
}

async fn predict_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PredictRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let output = ingestion::predict_and_record(
        &state.pool,
        state.predictor.as_ref(),
        user_id,
        &req.symbol,
    )
    .await?;

    Ok(Json(output))
}

async fn predict_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BatchPredictRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let items = ingestion::predict_batch_and_record(
        &state.pool,
        state.predictor.as_ref(),
        user_id,
        &req.symbols,
    )
    .await?;

    Ok(Json(items))
}
