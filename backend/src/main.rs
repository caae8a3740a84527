mod config;
mod db;
mod embedded_assets;
mod errors;
mod handlers;
mod models;
mod responses;
mod store;

use crate::config::Config;
use crate::store::{ItemStore, MemoryItemStore, PgItemStore};
use clap::Parser;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug, Clone)]
#[command(name = "backend")]
#[command(about = "Items CRUD API and web client server")]
struct Args {
    /// Enable development mode (in-memory store when DATABASE_URL is unset)
    #[arg(long)]
    dev_mode: bool,
}

/// Shared by every handler. Built once at boot.
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if args.dev_mode {
        tracing::warn!("DEV MODE ENABLED");
    }

    // Load .env file if present
    dotenvy::dotenv().ok();

    // Missing TABLE_NAME (or DATABASE_URL outside dev mode) stops boot here.
    let config = match Config::from_env(args.dev_mode) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            return Err(e);
        }
    };

    let store: Arc<dyn ItemStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)?;
            tracing::info!("Ensuring table {} exists...", config.table_name);
            db::ensure_table(&pool, &config.table_name)?;
            Arc::new(PgItemStore::new(pool, &config.table_name))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; items are kept in memory only");
            Arc::new(MemoryItemStore::new())
        }
    };

    let app_state = Arc::new(AppState { store });

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Router
    let app = handlers::routes()
        .with_state(app_state)
        .fallback(axum::routing::get(embedded_assets::serve_web_client))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
