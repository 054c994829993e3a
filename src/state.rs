use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenVerifier;
use crate::external::predictor::Predictor;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub predictor: Arc<dyn Predictor>,
    pub verifier: TokenVerifier,
}
