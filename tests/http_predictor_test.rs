use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockcast_backend::external::http_predictor::HttpPredictor;
use stockcast_backend::external::predictor::{BatchItem, Predictor, PredictorError};

fn client_for(server: &MockServer) -> HttpPredictor {
    HttpPredictor::with_client(server.uri(), reqwest::Client::new())
}

#[tokio::test]
async fn predict_one_parses_successful_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/"))
        .and(body_json(json!({ "symbol": "AAPL" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "AAPL",
            "direction": "UP",
            "confidence": 0.72,
            "signal": "BUY",
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let output = client_for(&server).predict_one("AAPL").await.unwrap();
    assert_eq!(output.symbol, "AAPL");
    assert!((output.confidence - 0.72).abs() < 1e-9);
}

#[tokio::test]
async fn predict_one_maps_server_error_to_bad_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).predict_one("AAPL").await.unwrap_err();
    assert!(matches!(err, PredictorError::BadResponse(_)));
}

#[tokio::test]
async fn unreachable_predictor_is_a_network_error() {
    // Nothing listens on this port
    let predictor = HttpPredictor::with_client("http://127.0.0.1:9", reqwest::Client::new());

    let err = predictor.predict_one("AAPL").await.unwrap_err();
    assert!(matches!(err, PredictorError::Network(_)));
}

#[tokio::test]
async fn batch_keeps_per_symbol_failures_inline() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/batch"))
        .and(body_json(json!({ "symbols": ["AAPL", "BADSYM"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "symbol": "AAPL",
                "direction": "UP",
                "confidence": 0.61,
                "signal": "BUY",
                "timestamp": "2024-05-01T12:00:00Z"
            },
            { "symbol": "BADSYM", "error": "unknown symbol" }
        ])))
        .mount(&server)
        .await;

    let symbols = vec!["AAPL".to_string(), "BADSYM".to_string()];
    let items = client_for(&server).predict_batch(&symbols).await.unwrap();

    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], BatchItem::Success(p) if p.symbol == "AAPL"));
    assert!(matches!(&items[1], BatchItem::Failure(f) if f.symbol == "BADSYM"));
}

#[tokio::test]
async fn garbled_batch_body_is_a_bad_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let symbols = vec!["AAPL".to_string()];
    let err = client_for(&server).predict_batch(&symbols).await.unwrap_err();
    assert!(matches!(err, PredictorError::BadResponse(_)));
}
