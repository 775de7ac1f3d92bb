use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cupcakes::api::create_api_router;
use cupcakes::config::Config;
use cupcakes::entities::setup_schema;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cupcakes=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;

    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);
    let db: DatabaseConnection = Database::connect(options).await?;
    setup_schema(&db).await?;

    let shared_db = Arc::new(db);

    let app = create_api_router(shared_db, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, trace = config.debug_trace, "Running");
    axum::serve(listener, app).await?;
    Ok(())
}
