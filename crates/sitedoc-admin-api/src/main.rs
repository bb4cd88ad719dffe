//! Data-plane API for the sitedoc admin console.
//!
//! This service:
//! - Checks out the single site content document at startup (seeding an
//!   empty store with the built-in defaults)
//! - Exposes read/save/section operations over HTTP for the console
//! - Performs guarded saves where the store schema allows, and refuses
//!   further writes after a version conflict until the session is reloaded
//!
//! Authentication is deliberately absent: deploy behind an identity-aware
//! proxy.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;

use config::Config;
use handlers::AppState;
use sitedoc_store_core::{ContentClient, DocumentStore};
use sitedoc_store_memory::MemoryStore;
use sitedoc_store_postgrest::{PostgrestConfig, PostgrestStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    info!("Starting sitedoc-admin-api v{}", env!("CARGO_PKG_VERSION"));
    info!("  Host: {}", config.host);
    info!("  Port: {}", config.port);
    info!("  Store: {}", config.store);

    let store: Arc<dyn DocumentStore> = match config.store.as_str() {
        "postgrest" => {
            let base_url = config.postgrest_url.clone().ok_or_else(|| {
                anyhow::anyhow!("--postgrest-url (SUPABASE_URL) is required for the postgrest store")
            })?;
            let api_key = config.postgrest_key.clone().ok_or_else(|| {
                anyhow::anyhow!("--postgrest-key (SUPABASE_KEY) is required for the postgrest store")
            })?;
            info!("  PostgREST: {} (table {})", base_url, config.table);

            let mut postgrest = PostgrestConfig::new(base_url, api_key);
            postgrest.table = config.table.clone();
            postgrest.swap_function = config.swap_function.clone();
            postgrest.row_id = config.row_id;
            Arc::new(PostgrestStore::new(postgrest))
        }
        "memory" => {
            warn!("  Using in-memory store; content will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        other => anyhow::bail!("unknown store backend: {other} (expected \"memory\" or \"postgrest\")"),
    };

    // Check out the document; this seeds an empty store with the defaults.
    let client = ContentClient::connect(store).await?;
    let status = client.status();
    info!("  Sections: {}", client.document().sections.len());
    info!("  Capability: {:?}", status.capability);
    if let Some(warning) = status.warning {
        warn!("  {}", warning);
    }
    warn!("  Auth: none (front this service with an identity-aware proxy)");

    let state = AppState::new(client);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Bind and serve
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, initiating shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
        info!("Received SIGTERM, initiating shutdown");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
