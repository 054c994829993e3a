mod prediction;
mod user;
mod watchlist;

pub use prediction::{
    CreatePredictionRequest, Direction, Prediction, Signal,
};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
pub use watchlist::{AddWatchlistRequest, WatchlistEntry};
