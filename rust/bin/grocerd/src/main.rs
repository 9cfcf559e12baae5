//! `grocerd` — the shopping-list server binary.
//!
//! Usage:
//!   grocerd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/grocer/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use grocer_core::Module;
use tracing::info;

use config::ServerConfig;

/// Shopping-list server.
#[derive(Parser, Debug)]
#[command(name = "grocerd", about = "Shopping-list server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    // Initialize storage. The store is constructed here, once, and
    // injected into the service — no module-level globals.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = grocer_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        db_path: server_config.storage.db_path.clone().map(Into::into),
        listen: cli.listen.clone(),
    };

    let sql: Arc<dyn grocer_sql::SQLStore> = Arc::new(
        grocer_sql::SqliteStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // The change feed carries row-level events to connected clients.
    let feed = Arc::new(grocer_flux::EventFeed::new());

    let service = shopping::service::ShoppingService::new(Arc::clone(&sql), Arc::clone(&feed))
        .map_err(|e| anyhow::anyhow!("failed to initialise shopping service: {}", e))?;
    info!("Shopping service initialized");

    // Bootstrap: seed the catalog on first start.
    bootstrap::seed_catalog(&service)?;

    let shopping_module = shopping::ShoppingModule::new(Arc::clone(&service));
    let module_routes = vec![(shopping_module.name(), shopping_module.routes())];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("grocerd listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
