use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ==============================================================================
// Prediction Row
// ==============================================================================

/// One stored prediction. Rows are immutable history; the `prediction`
/// column holds the predictor's `direction` value (the rename happens at
/// the ingestion boundary, see `services::ingestion`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub symbol: String,
    pub prediction: String,
    pub confidence: f64,
    pub signal: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePredictionRequest {
    pub symbol: String,
    pub prediction: Direction,
    pub confidence: f64,
    pub signal: Signal,
}

// ==============================================================================
// Direction / Signal Enums
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    NoTrade,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::NoTrade => "NO_TRADE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(Signal::Buy),
            "SELL" => Some(Signal::Sell),
            "NO_TRADE" => Some(Signal::NoTrade),
            _ => None,
        }
    }

    /// Documented policy mapping confidence to a trading signal. The store
    /// accepts predictor-supplied signals as-is (trust boundary); this is
    /// the single place the rule lives, used for verification only.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.55 {
            Signal::Buy
        } else if confidence < 0.45 {
            Signal::Sell
        } else {
            Signal::NoTrade
        }
    }
}
