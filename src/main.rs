//! Anima Prime - tabletop RPG companion API
//! Mission: Serve characters, conflicts, eidolons, powers and scenes to their owners

use anima_prime::{
    api::{create_router, AppState},
    config::{load_env, AppConfig},
    store::DocumentStore,
};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = AppConfig::parse();
    info!("🚀 Anima Prime v{} starting", env!("CARGO_PKG_VERSION"));

    let db_path = config.database_path();
    let store = DocumentStore::open(&db_path)
        .with_context(|| format!("Failed to open document store at {}", db_path.display()))?;
    let state = AppState::new(store);

    match config.admin_credentials() {
        Some((email, password)) => {
            if let Some(key) = state.users.ensure_admin(email, password)? {
                info!("👤 Admin account ready: {} ({})", email, key);
            }
        }
        None => warn!("⚠️  ANIMA_ADMIN_EMAIL/ANIMA_ADMIN_PASSWORD not set; skipping admin bootstrap"),
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("🎯 API server listening on {}", config.bind);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing; RUST_LOG overrides the default filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anima_prime=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
