mod config;
mod init;
mod schema;
mod store;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::load_settings_from_path;
use store::mongo::MongoStore;
use store::SchemaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration.
    let settings = load_settings_from_path(config::config_path())?;
    info!(
        "Configuration loaded: database={}, collections={}",
        settings.database,
        settings.schema.collections.len()
    );

    // Connect and verify the instance is reachable before touching the
    // schema catalog.
    let store = MongoStore::new(
        &settings.mongo_uri,
        &settings.database,
        settings.server_selection_timeout,
    )
    .await?;
    store.ping().await?;

    // One idempotent pass over the manifest.
    init::run(&store, &settings.schema).await?;

    println!("Database {} is now initialized", settings.database);
    Ok(())
}
