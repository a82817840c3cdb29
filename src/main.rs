use anyhow::Context;
use dotenv::dotenv;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod app_state;
mod auth;
mod config;
mod db;
mod error;
mod export;
mod middleware;
mod modules;
mod schedule;
mod websocket;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let env = config::init()?.clone();

    let db = db::init_pool().await.context("Failed to set up database")?;

    let (ws_tx, _) = broadcast::channel::<String>(100);
    let ws_tx = Arc::new(Mutex::new(ws_tx));

    let state = app_state::AppState::new(db, env.clone(), ws_tx);
    let app = app::create_router(state);

    let addr = env.server_addr();
    info!("{} listening on {}", env.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
