use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    SqliteConnection,
};
use time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

mod config;
mod data;
mod features;
mod handlers;
mod schema;
mod state;
mod utils;

use config::Config;
use state::AppState;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;

    // Database
    let pool = data::migrations::init_pool(&config.database_url)
        .with_context(|| format!("Failed to create DB pool for {}", config.database_url))?;
    {
        let mut conn = pool.get().context("Failed to get DB connection")?;
        data::migrations::run_migrations(&mut conn).context("Failed to create schema")?;
    }

    // Sessions
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_expiry(Expiry::OnInactivity(Duration::days(config.session_expiry_days)))
        .with_secure(config.cookie_secure);

    // The SPA runs on its own origin and sends the session cookie.
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS_ORIGIN {}", config.cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = handlers::app_router(AppState::new(pool, &config))
        .layer(session_layer)
        .layer(cors);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;

    log::info!("Server running on http://{}", config.bind_address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
