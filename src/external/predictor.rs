use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Direction, Signal};

/// One successful prediction as the external service reports it. The
/// service speaks `direction`; the store speaks `prediction` — that
/// translation happens in the ingestion pipeline, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorOutput {
    pub symbol: String,
    pub direction: Direction,
    pub confidence: f64,
    pub signal: Signal,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub symbol: String,
    pub error: String,
}

/// Per-symbol batch outcome. A failed symbol never aborts the batch;
/// it travels alongside the successes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Success(PredictorOutput),
    Failure(BatchFailure),
}

impl BatchItem {
    pub fn failure(symbol: impl Into<String>, error: impl Into<String>) -> Self {
        BatchItem::Failure(BatchFailure {
            symbol: symbol.into(),
            error: error.into(),
        })
    }
}

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),
}

#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict_one(&self, symbol: &str) -> Result<PredictorOutput, PredictorError>;

    /// One outcome per requested symbol, order not guaranteed to match
    /// the input. Transport failures for the whole call surface as `Err`;
    /// per-symbol failures come back as `BatchItem::Failure`.
    async fn predict_batch(&self, symbols: &[String]) -> Result<Vec<BatchItem>, PredictorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_item_deserializes_success_and_failure() {
        let raw = r#"[
            {"symbol":"AAPL","direction":"UP","confidence":0.7,"signal":"BUY","timestamp":"2024-05-01T12:00:00Z"},
            {"symbol":"BADSYM","error":"unknown symbol"}
        ]"#;

        let items: Vec<BatchItem> = serde_json::from_str(raw).unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], BatchItem::Success(p) if p.symbol == "AAPL"));
        assert!(matches!(&items[1], BatchItem::Failure(f) if f.symbol == "BADSYM"));
    }

    #[test]
    fn failure_serializes_to_error_marker() {
        let item = BatchItem::failure("TSLA", "timeout");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["symbol"], "TSLA");
        assert_eq!(json["error"], "timeout");
    }
}
