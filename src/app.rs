use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{auth, health, predictions, watchlist};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/predictions", predictions::router())
        .nest("/api/predict", predictions::predict_router())
        .nest("/api/watchlist", watchlist::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
