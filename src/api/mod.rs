pub mod cupcake;

use axum::{middleware::from_fn, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::logging::logging_middleware;
use cupcake::cupcake_router;

pub fn create_api_router(shared_db: Arc<DatabaseConnection>, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api", cupcake_router(shared_db, config.update_policy))
        .layer(from_fn(logging_middleware));

    if config.debug_trace {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
