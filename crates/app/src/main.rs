//! Podium - judging board with local/remote dual-write
//!
//! Console front end over the sync engine. Works offline against the local
//! database; mirrors to the hosted store when one is configured and
//! reachable.

use std::sync::Arc;

use podium_core::Database;
use podium_net::{RemoteStore, RestStore};
use podium_sync::SyncEngine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod console;

use config::AppConfig;

fn open_database(config: &AppConfig) -> Result<Database, Box<dyn std::error::Error>> {
    let db_path = config.database_path()?;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %db_path.display(), "Opening local store");
    Ok(Database::open(&db_path)?)
}

fn build_remote(config: &AppConfig) -> Option<Arc<dyn RemoteStore>> {
    let remote = config.remote.clone()?;
    match RestStore::new(remote) {
        Ok(store) => {
            tracing::info!(url = %store.base_url(), "Remote store configured");
            let store: Arc<dyn RemoteStore> = Arc::new(store);
            Some(store)
        }
        Err(e) => {
            tracing::error!(error = %e, "Invalid remote configuration, running local-only");
            None
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Podium");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db = match open_database(&config) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open local store: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    let result = runtime.block_on(async {
        let mut engine = SyncEngine::new(Box::new(db), build_remote(&config));
        engine.start().await;

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        console::run(&mut engine, stdin, &mut stdout).await
    });

    if let Err(e) = result {
        tracing::error!("Console failed: {}", e);
        std::process::exit(1);
    }
}
