use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use circles::config::AppConfig;
use circles::database::schema;
use circles::web::{self, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("circles=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    let db_url = config
        .database_url
        .clone()
        .ok_or("DATABASE_URL must be set")?;
    info!("connecting to database: {}", db_url);

    let connect_options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;
    schema::migrate(&pool).await?;

    let host = config.host.clone();
    let port = config.port;
    let app = web::router(AppState::new(pool, config));

    // Start the server, falling back to the next port when busy
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback: SocketAddr = format!("{}:{}", host, port.saturating_add(1)).parse()?;
            warn!("could not bind {}: {}. Trying {}", addr, e, fallback);
            tokio::net::TcpListener::bind(fallback).await?
        }
    };

    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
