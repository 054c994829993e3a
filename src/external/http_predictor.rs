use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::external::predictor::{BatchItem, Predictor, PredictorError, PredictorOutput};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the external prediction service:
/// `POST {base}/predict/` for one symbol, `POST {base}/predict/batch`
/// for many. Calls are bounded by a client-level timeout.
pub struct HttpPredictor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictor {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("PREDICTOR_BASE_URL")
            .map_err(|_| anyhow::anyhow!("PREDICTOR_BASE_URL not set"))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict_one(&self, symbol: &str) -> Result<PredictorOutput, PredictorError> {
        let url = format!("{}/predict/", self.base_url);

        let resp = self
            .client
            .post(&url)
            .json(&json!({ "symbol": symbol }))
            .send()
            .await
            .map_err(|e| PredictorError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PredictorError::BadResponse(format!(
                "predictor returned status {}",
                resp.status()
            )));
        }

        resp.json::<PredictorOutput>()
            .await
            .map_err(|e| PredictorError::BadResponse(e.to_string()))
    }

    async fn predict_batch(&self, symbols: &[String]) -> Result<Vec<BatchItem>, PredictorError> {
        let url = format!("{}/predict/batch", self.base_url);

        let resp = self
            .client
            .post(&url)
            .json(&json!({ "symbols": symbols }))
            .send()
            .await
            .map_err(|e| PredictorError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PredictorError::BadResponse(format!(
                "predictor returned status {}",
                resp.status()
            )));
        }

        resp.json::<Vec<BatchItem>>()
            .await
            .map_err(|e| PredictorError::BadResponse(e.to_string()))
    }
}
