use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use common::storage::FilesystemMediaStore;
use tower_http::cors::CorsLayer;
use tracing::{Level, info};

use server::config::{AppConfig, CorsConfig};
use server::handlers::images::IMAGE_UPLOAD_PREFIX;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::seed_bootstrap_operator(&db, &config.auth).await?;
    server::seed::ensure_indexes(&db).await?;

    let media = FilesystemMediaStore::new(
        config.storage.media_root.clone(),
        IMAGE_UPLOAD_PREFIX,
        config.storage.max_upload_size,
    )
    .await?;

    let state = AppState {
        db,
        media: Arc::new(media),
        config: config.clone(),
    };

    let mut app = server::build_router(state);
    if !config.server.cors.allow_origins.is_empty() {
        app = app.layer(cors_layer(&config.server.cors)?);
    }

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(cors: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origins = cors
        .allow_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(cors.max_age)))
}
