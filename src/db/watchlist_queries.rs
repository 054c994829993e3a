use sqlx::error::ErrorKind;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::WatchlistEntry;

/// Insert relying on the `(user_id, symbol)` unique constraint: the
/// database resolves the concurrent duplicate-add race, we only translate
/// the violation. No check-then-insert.
pub async fn add_entry(
    pool: &PgPool,
    user_id: Uuid,
    symbol: &str,
) -> Result<WatchlistEntry, AppError> {
    sqlx::query_as::<_, WatchlistEntry>(
        r#"
        INSERT INTO watchlist_entries (user_id, symbol)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(symbol)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::UniqueViolation) => {
            AppError::Duplicate("Symbol already in watchlist".to_string())
        }
        _ => AppError::Db(e),
    })
}

/// Deleting an entry that does not exist is `NotFound`, never a 500.
pub async fn remove_entry(pool: &PgPool, user_id: Uuid, symbol: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM watchlist_entries WHERE user_id = $1 AND symbol = $2")
        .bind(user_id)
        .bind(symbol)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn list_entries(pool: &PgPool, user_id: Uuid) -> Result<Vec<WatchlistEntry>, sqlx::Error> {
    sqlx::query_as::<_, WatchlistEntry>(
        r#"
        SELECT * FROM watchlist_entries
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
