pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod predictions;
pub(crate) mod watchlist;
