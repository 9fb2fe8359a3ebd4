mod api;
mod middleware;

use std::sync::Arc;

use fbdb_archive::FeedbackArchive;
use fbdb_db::{MemoryStore, PgStore, RecordStore};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::{AdminAuth, RateLimitState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = fbdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = open_store(&config).await?;
    let auth = AdminAuth::from_config(&config)?;
    let admin_auth = auth.enabled();
    let app = build_app(
        AppState {
            archive: FeedbackArchive::new(store),
        },
        auth,
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        admin_auth,
        "feedback server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise an in-memory store.
async fn open_store(config: &fbdb_core::AppConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set; records are kept in memory and lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = fbdb_db::connect_pool_from_config(config).await?;
    let applied = fbdb_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");
    Ok(Arc::new(PgStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
