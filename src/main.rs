use dotenvy::dotenv;
use finance_manager::{
    cli::{self, Repositories},
    config::{create_connection, create_tables, load_default_config},
    core::seed_categories,
    errors::Result,
};
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load config.toml (optional), then apply environment overrides
    let app_config = load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let db_config = app_config.database.with_env_overrides()?;

    // 4. Connect and make sure the schema exists
    let db = create_connection(&db_config)
        .await
        .inspect_err(|e| error!("Failed to connect to {}: {}", db_config.url, e))?;
    create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed configured categories that are missing
    let repos = Repositories::new(db);
    seed_categories(&repos.categories, &app_config.categories)
        .await
        .inspect_err(|e| error!("Failed to seed categories: {}", e))?;

    // 6. Run the menu on the terminal
    let outcome = cli::run(&repos, io::stdin().lock(), io::stdout().lock()).await;
    repos.close().await?;
    info!("Connection closed.");
    outcome
}
