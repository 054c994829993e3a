//! The prediction write path: normalize symbols, fan out to the external
//! predictor, persist successful results per user, and merge everything
//! into one response. Storage is a side effect here — the response
//! contract reflects predictor results, never storage results.

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::prediction_queries;
use crate::errors::AppError;
use crate::external::predictor::{BatchItem, Predictor, PredictorError, PredictorOutput};

/// Upper-cases and trims a raw ticker. Blank input is `InvalidSymbol`;
/// nothing blank ever reaches the network.
pub fn normalize_symbol(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidSymbol);
    }
    Ok(trimmed.to_uppercase())
}

/// Splits raw batch input into normalized symbols and inline failure
/// markers for the blank ones. Validation failures are isolated per
/// symbol, the same way predictor failures are.
fn split_valid(raw_symbols: &[String]) -> (Vec<String>, Vec<BatchItem>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for raw in raw_symbols {
        match normalize_symbol(raw) {
            Ok(symbol) => valid.push(symbol),
            Err(_) => invalid.push(BatchItem::failure(raw.trim(), "Invalid symbol")),
        }
    }
    (valid, invalid)
}

/// Calls the predictor for the valid symbols and appends the validation
/// failures, so the caller sees one entry per input symbol.
async fn fan_out(
    predictor: &dyn Predictor,
    valid: Vec<String>,
    mut invalid: Vec<BatchItem>,
) -> Result<Vec<BatchItem>, AppError> {
    let mut items = if valid.is_empty() {
        Vec::new()
    } else {
        predictor
            .predict_batch(&valid)
            .await
            .map_err(unavailable)?
    };

    items.append(&mut invalid);
    Ok(items)
}

fn unavailable(e: PredictorError) -> AppError {
    AppError::PredictionUnavailable(e.to_string())
}

/// Best-effort persistence of one predictor result. The predictor's
/// `direction` lands in the store's `prediction` column — this is the
/// single translation point between the two vocabularies.
async fn persist_output(pool: &PgPool, user_id: Uuid, output: &PredictorOutput) -> bool {
    match prediction_queries::create_prediction(
        pool,
        user_id,
        &output.symbol,
        output.direction.as_str(),
        output.confidence,
        output.signal.as_str(),
    )
    .await
    {
        Ok(_) => true,
        Err(e) => {
            warn!("⚠️ Failed to persist prediction for {}: {}", output.symbol, e);
            false
        }
    }
}

/// Single-symbol write path. Predictor failures propagate; persistence
/// failures are logged and swallowed.
pub async fn predict_and_record(
    pool: &PgPool,
    predictor: &dyn Predictor,
    user_id: Uuid,
    raw_symbol: &str,
) -> Result<PredictorOutput, AppError> {
    let symbol = normalize_symbol(raw_symbol)?;
    let output = predictor.predict_one(&symbol).await.map_err(unavailable)?;

    persist_output(pool, user_id, &output).await;
    Ok(output)
}

/// Batch write path. Returns one entry per input symbol (success or
/// error marker); only successes are persisted, each best-effort.
pub async fn predict_batch_and_record(
    pool: &PgPool,
    predictor: &dyn Predictor,
    user_id: Uuid,
    raw_symbols: &[String],
) -> Result<Vec<BatchItem>, AppError> {
    if raw_symbols.is_empty() {
        return Err(AppError::Validation("symbols must not be empty".to_string()));
    }

    let (valid, invalid) = split_valid(raw_symbols);
    let items = fan_out(predictor, valid, invalid).await?;

    // Row inserts are independent, so successes persist concurrently;
    // error markers are skipped but stay in the response.
    let writes: Vec<_> = items
        .iter()
        .filter_map(|item| match item {
            BatchItem::Success(output) => Some(persist_output(pool, user_id, output)),
            BatchItem::Failure(_) => None,
        })
        .collect();

    let attempted = writes.len();
    let persisted = futures::future::join_all(writes)
        .await
        .into_iter()
        .filter(|ok| *ok)
        .count();

    info!(
        "📊 Batch predict for user {}: {} persisted, {} failed symbols",
        user_id,
        persisted,
        items.len() - attempted
    );

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    use crate::models::{Direction, Signal};

    /// Deterministic stand-in for the external service: symbols listed in
    /// `failing` come back as error markers, everything else succeeds.
    struct StubPredictor {
        failing: Vec<&'static str>,
    }

    impl StubPredictor {
        fn output(symbol: &str) -> PredictorOutput {
            PredictorOutput {
                symbol: symbol.to_string(),
                direction: Direction::Up,
                confidence: 0.7,
                signal: Signal::Buy,
                timestamp: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl Predictor for StubPredictor {
        async fn predict_one(&self, symbol: &str) -> Result<PredictorOutput, PredictorError> {
            if self.failing.contains(&symbol) {
                return Err(PredictorError::BadResponse("unknown symbol".into()));
            }
            Ok(Self::output(symbol))
        }

        async fn predict_batch(
            &self,
            symbols: &[String],
        ) -> Result<Vec<BatchItem>, PredictorError> {
            Ok(symbols
                .iter()
                .map(|s| {
                    if self.failing.contains(&s.as_str()) {
                        BatchItem::failure(s.clone(), "unknown symbol")
                    } else {
                        BatchItem::Success(Self::output(s))
                    }
                })
                .collect())
        }
    }

    #[test]
    fn normalize_uppercases() {
        assert_eq!(normalize_symbol("aapl").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("  tsla ").unwrap(), "TSLA");
    }

    #[test]
    fn blank_symbol_is_rejected() {
        assert!(matches!(normalize_symbol(""), Err(AppError::InvalidSymbol)));
        assert!(matches!(normalize_symbol("   "), Err(AppError::InvalidSymbol)));
    }

    #[test]
    fn split_isolates_blank_entries() {
        let raw = vec!["aapl".to_string(), " ".to_string(), "msft".to_string()];
        let (valid, invalid) = split_valid(&raw);
        assert_eq!(valid, vec!["AAPL", "MSFT"]);
        assert_eq!(invalid.len(), 1);
    }

    #[tokio::test]
    async fn fan_out_keeps_partial_failures_inline() {
        let stub = StubPredictor {
            failing: vec!["BADSYM"],
        };
        let (valid, invalid) = split_valid(&[
            "aapl".to_string(),
            "badsym".to_string(),
            "".to_string(),
        ]);

        let items = fan_out(&stub, valid, invalid).await.unwrap();
        assert_eq!(items.len(), 3);

        let successes = items
            .iter()
            .filter(|i| matches!(i, BatchItem::Success(_)))
            .count();
        let failures = items
            .iter()
            .filter(|i| matches!(i, BatchItem::Failure(_)))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(failures, 2);
    }

    #[tokio::test]
    async fn single_predict_propagates_predictor_failure() {
        let stub = StubPredictor {
            failing: vec!["BADSYM"],
        };
        let err = stub.predict_one("BADSYM").await.unwrap_err();
        assert!(matches!(
            unavailable(err),
            AppError::PredictionUnavailable(_)
        ));
    }
}
