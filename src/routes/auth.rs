use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::auth::{self, hash_password, verify_password};
use crate::db::user_queries;
use crate::errors::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let user = user_queries::create_user(&state.pool, &email, &password_hash, req.name.as_deref())
        .await?;

    info!("👤 Registered user {}", user.id);

    let token = state.verifier.issue(user.id)?;
    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = user_queries::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.verifier.issue(user.id)?;
    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth::authenticate(&headers, &state.verifier)?;

    let user = user_queries::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}
