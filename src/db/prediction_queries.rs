use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Prediction;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

/// Inserts one immutable history row. The caller upper-cases the symbol
/// before insertion; the store does not re-normalize.
pub async fn create_prediction(
    pool: &PgPool,
    user_id: Uuid,
    symbol: &str,
    prediction: &str,
    confidence: f64,
    signal: &str,
) -> Result<Prediction, sqlx::Error> {
    sqlx::query_as::<_, Prediction>(
        r#"
        INSERT INTO predictions (user_id, symbol, prediction, confidence, signal)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(symbol)
    .bind(prediction)
    .bind(confidence)
    .bind(signal)
    .fetch_one(pool)
    .await
}

/// Most recent first. `symbol` is an exact match filter when present;
/// `limit` is assumed validated (positive, capped) by the route layer.
pub async fn list_predictions(
    pool: &PgPool,
    user_id: Uuid,
    symbol: Option<&str>,
    limit: i64,
) -> Result<Vec<Prediction>, sqlx::Error> {
    match symbol {
        Some(symbol) => {
            sqlx::query_as::<_, Prediction>(
                r#"
                SELECT * FROM predictions
                WHERE user_id = $1 AND symbol = $2
                ORDER BY date DESC
                LIMIT $3
                "#,
            )
            .bind(user_id)
            .bind(symbol)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Prediction>(
                r#"
                SELECT * FROM predictions
                WHERE user_id = $1
                ORDER BY date DESC
                LIMIT $2
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}
