use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use stockcast_backend::app;
use stockcast_backend::auth::TokenVerifier;
use stockcast_backend::external::http_predictor::HttpPredictor;
use stockcast_backend::logging::{self, LoggingConfig};
use stockcast_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let database_url = std::env::var("DATABASE_URL")?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    let predictor = Arc::new(HttpPredictor::from_env()?);
    let verifier = TokenVerifier::from_env()?;

    let state = AppState {
        pool,
        predictor,
        verifier,
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Stockcast backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
