use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod db;
mod middleware;
mod models;
mod repo;
mod storage;

use db::PackageIndex;
use models::ServerConfig;
use storage::DistStore;

#[derive(Clone)]
pub struct AppState {
    packages: Arc<PackageIndex>,
    store: Arc<DistStore>,
    config: ServerConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "packbay_api=debug,axum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Initialize the package index with migrations
    let db = db::init_db(&config.db_path).await?;
    info!("Package index ready at {}", config.db_path);

    let packages = Arc::new(PackageIndex::new(db.inner().clone()));
    let store = Arc::new(DistStore::new(config.dist_root.clone()));
    info!("Serving dists from {}", config.dist_root);

    let state = AppState {
        packages,
        store,
        config: config.clone(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .merge(repo::routes())
        .layer(axum::middleware::from_fn(middleware::access_log))
        .with_state(state);

    let addr = config.bind_addr;
    info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
