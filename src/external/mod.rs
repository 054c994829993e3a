pub mod http_predictor;
pub mod predictor;
