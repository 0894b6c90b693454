//! # Shift API Server
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) DATABASE_URL=postgresql://... cargo run -p shift-api
//! ```
//!
//! Without `DATABASE_URL` the server keeps documents in memory.

use anyhow::Context;
use shift_api::app::{build_router, AppState};
use shift_api::config::Config;
use shift_shared::db::migrations::run_migrations;
use shift_shared::db::pool::{close_pool, create_pool, PoolConfig};
use shift_shared::store::{global, DocumentStore, MemoryStore, PgDocumentStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shift_api=debug,shift_shared=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.api.log_json);

    tracing::info!("Shift API Server v{} starting", env!("CARGO_PKG_VERSION"));

    let postgres = match &config.database.url {
        Some(url) => {
            let pool_config = PoolConfig::new(url.clone()).max_connections(config.database.max_connections);
            let pool = create_pool(pool_config)
                .await
                .context("Failed to connect to PostgreSQL")?;

            run_migrations(&pool).await.context("Failed to run migrations")?;
            Some(Arc::new(PgDocumentStore::connect(pool).await?))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, documents are kept in memory and lost on restart");
            None
        }
    };

    let store: Arc<dyn DocumentStore> = match &postgres {
        Some(pg) => pg.clone(),
        None => Arc::new(MemoryStore::new()),
    };
    global::init(store)?;
    let store = global::handle()?;
    tracing::info!(backend = store.backend(), "Document store ready");

    let state = AppState::from_config(store, config.clone())?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    tracing::info!("Listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = postgres {
        pg.close();
        close_pool(pg.pool().clone()).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
