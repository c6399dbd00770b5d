//! # cadeau-server
//!
//! Account service for the Cadeau storefront demo.
//!
//! This binary provides:
//! - the slot-backed user store (opened at startup, legacy records migrated
//!   and the default admin seeded before anything else runs)
//! - **REST API** (axum) for health checks, user-list replication, and the
//!   disabled payment-gateway stubs
//! - the background replication task when a hub URL is configured

mod api;
mod config;
mod error;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cadeau_store::{migrate::migrate_legacy_users, SessionSlots, SlotStore, StartupGuards, UserStore};
use cadeau_sync::{spawn_replication, SyncClient, SyncHub};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cadeau_server=debug")),
        )
        .init();

    info!("Starting Cadeau account server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // Open the store and run the startup routines in order: migration
    // first, then admin seeding, before any operation can observe the list.
    let slots = match &config.data_dir {
        Some(dir) => SlotStore::open_at(dir)?,
        None => SlotStore::open_default()?,
    };
    let store = Arc::new(UserStore::new(slots));

    let mut guards = StartupGuards::new();
    let session = SessionSlots::new();
    migrate_legacy_users(&store, &mut guards, &session);
    if config.seed_admin {
        cadeau_auth::seed_admin(&store, &mut guards, &session);
    }

    // Replication: push saves to the hub, pull on an interval.
    let mut replication = None;
    if let Some(hub_url) = &config.hub_url {
        info!(hub_url, "replication enabled");
        let client = SyncClient::new(hub_url);
        replication = Some(spawn_replication(
            store.clone(),
            client,
            config.sync_interval,
        ));
    }

    let hub = SyncHub::new();
    let app = api::build_router(hub);

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = replication {
        task.abort();
    }
    info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
