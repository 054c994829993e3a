use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth;
use crate::db::watchlist_queries;
use crate::errors::AppError;
use crate::models::AddWatchlistRequest;
use crate::services::ingestion;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list).post(add).delete(remove))
}

#[derive(Debug, Deserialize)]
struct RemoveParams {
    symbol: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let entries = watchlist_queries::list_entries(&state.pool, user_id).await?;
    Ok(Json(entries))
}

async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddWatchlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let symbol = ingestion::normalize_symbol(&req.symbol)?;
    let entry = watchlist_queries::add_entry(&state.pool, user_id, &symbol).await?;

    info!("⭐ User {} added {} to watchlist", user_id, entry.symbol);
    Ok(Json(entry))
}

async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RemoveParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let raw = params.symbol.ok_or(AppError::MissingParameter("Symbol"))?;
    let symbol = ingestion::normalize_symbol(&raw)?;

    watchlist_queries::remove_entry(&state.pool, user_id, &symbol).await?;

    info!("🗑️ User {} removed {} from watchlist", user_id, symbol);
    Ok(Json(json!({ "success": true })))
}
