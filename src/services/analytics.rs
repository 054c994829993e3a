//! Pure, synchronous views over an already-fetched prediction history:
//! symbol/signal filtering and aggregate statistics for the dashboard.
//! No I/O here.

use serde::Serialize;

use crate::models::{Prediction, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalFilter {
    All,
    Only(Signal),
}

impl SignalFilter {
    /// Parses the `signal` query parameter: "ALL" (or absence) means no
    /// filtering, anything else must be a valid signal name.
    pub fn from_param(param: Option<&str>) -> Option<Self> {
        match param {
            None => Some(SignalFilter::All),
            Some(s) if s.eq_ignore_ascii_case("ALL") => Some(SignalFilter::All),
            Some(s) => Signal::from_str(s).map(SignalFilter::Only),
        }
    }

    fn matches(&self, signal: &str) -> bool {
        match self {
            SignalFilter::All => true,
            SignalFilter::Only(s) => signal == s.as_str(),
        }
    }
}

/// Case-insensitive symbol substring filter plus signal filter.
pub fn filter_predictions<'a>(
    predictions: &'a [Prediction],
    symbol_contains: Option<&str>,
    signal: SignalFilter,
) -> Vec<&'a Prediction> {
    let needle = symbol_contains.map(str::to_uppercase);
    predictions
        .iter()
        .filter(|p| {
            needle
                .as_deref()
                .map_or(true, |n| p.symbol.to_uppercase().contains(n))
        })
        .filter(|p| signal.matches(&p.signal))
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionStats {
    pub total: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub no_trade_count: usize,
    pub up_count: usize,
    pub down_count: usize,
    pub mean_confidence: f64,
    pub mean_confidence_buy: f64,
    pub mean_confidence_sell: f64,
    pub mean_confidence_no_trade: f64,
}

/// Counts per signal and direction plus mean confidence over the filtered
/// set. Empty input yields zero counts and 0.0 means, never NaN.
pub fn compute_stats(predictions: &[&Prediction]) -> PredictionStats {
    let mut stats = PredictionStats {
        total: predictions.len(),
        buy_count: 0,
        sell_count: 0,
        no_trade_count: 0,
        up_count: 0,
        down_count: 0,
        mean_confidence: 0.0,
        mean_confidence_buy: 0.0,
        mean_confidence_sell: 0.0,
        mean_confidence_no_trade: 0.0,
    };

    let mut sum = 0.0;
    let (mut buy_sum, mut sell_sum, mut no_trade_sum) = (0.0, 0.0, 0.0);

    for p in predictions {
        sum += p.confidence;
        match p.signal.as_str() {
            "BUY" => {
                stats.buy_count += 1;
                buy_sum += p.confidence;
            }
            "SELL" => {
                stats.sell_count += 1;
                sell_sum += p.confidence;
            }
            "NO_TRADE" => {
                stats.no_trade_count += 1;
                no_trade_sum += p.confidence;
            }
            _ => {}
        }
        match p.prediction.as_str() {
            "UP" => stats.up_count += 1,
            "DOWN" => stats.down_count += 1,
            _ => {}
        }
    }

    let mean = |total: f64, count: usize| {
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    };

    stats.mean_confidence = mean(sum, stats.total);
    stats.mean_confidence_buy = mean(buy_sum, stats.buy_count);
    stats.mean_confidence_sell = mean(sell_sum, stats.sell_count);
    stats.mean_confidence_no_trade = mean(no_trade_sum, stats.no_trade_count);

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn prediction(symbol: &str, direction: &str, confidence: f64, signal: &str) -> Prediction {
        Prediction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            prediction: direction.to_string(),
            confidence,
            signal: signal.to_string(),
            date: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Prediction> {
        vec![
            prediction("AAPL", "UP", 0.8, "BUY"),
            prediction("AAPL", "DOWN", 0.3, "SELL"),
            prediction("MSFT", "UP", 0.5, "NO_TRADE"),
            prediction("TSLA", "UP", 0.6, "BUY"),
        ]
    }

    #[test]
    fn substring_filter_is_case_insensitive() {
        let preds = sample();
        let filtered = filter_predictions(&preds, Some("aap"), SignalFilter::All);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|p| p.symbol == "AAPL"));
    }

    #[test]
    fn signal_filter_narrows_results() {
        let preds = sample();
        let filtered = filter_predictions(&preds, None, SignalFilter::Only(Signal::Buy));
        assert_eq!(filtered.len(), 2);

        let combined = filter_predictions(&preds, Some("TSLA"), SignalFilter::Only(Signal::Buy));
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].symbol, "TSLA");
    }

    #[test]
    fn all_filter_passes_everything() {
        let preds = sample();
        assert_eq!(filter_predictions(&preds, None, SignalFilter::All).len(), 4);
    }

    #[test]
    fn filter_param_parsing() {
        assert_eq!(SignalFilter::from_param(None), Some(SignalFilter::All));
        assert_eq!(SignalFilter::from_param(Some("ALL")), Some(SignalFilter::All));
        assert_eq!(SignalFilter::from_param(Some("all")), Some(SignalFilter::All));
        assert_eq!(
            SignalFilter::from_param(Some("BUY")),
            Some(SignalFilter::Only(Signal::Buy))
        );
        assert_eq!(SignalFilter::from_param(Some("HOLD")), None);
    }

    #[test]
    fn stats_over_sample() {
        let preds = sample();
        let filtered = filter_predictions(&preds, None, SignalFilter::All);
        let stats = compute_stats(&filtered);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.buy_count, 2);
        assert_eq!(stats.sell_count, 1);
        assert_eq!(stats.no_trade_count, 1);
        assert_eq!(stats.up_count, 3);
        assert_eq!(stats.down_count, 1);
        assert!((stats.mean_confidence - 0.55).abs() < 1e-9);
        assert!((stats.mean_confidence_buy - 0.7).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_zeroes_not_nan() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.mean_confidence, 0.0);
        assert_eq!(stats.mean_confidence_buy, 0.0);
        assert!(!stats.mean_confidence.is_nan());
    }

    #[test]
    fn absent_signal_mean_is_zero() {
        let preds = vec![prediction("AAPL", "UP", 0.9, "BUY")];
        let filtered = filter_predictions(&preds, None, SignalFilter::All);
        let stats = compute_stats(&filtered);
        assert_eq!(stats.mean_confidence_sell, 0.0);
        assert_eq!(stats.mean_confidence_no_trade, 0.0);
    }
}
