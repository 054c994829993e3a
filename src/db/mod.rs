pub mod prediction_queries;
pub mod user_queries;
pub mod watchlist_queries;
