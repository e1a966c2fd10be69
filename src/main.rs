use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oxcart::auth::CredentialService;
use oxcart::config::AppConfig;
use oxcart::media::DiskMediaStore;
use oxcart::notify::LogMailer;
use oxcart::routes;
use oxcart::state::{AppState, Repositories};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let client = mongodb::Client::with_uri_str(&config.database_url)
        .await
        .context("mongodb connection failed")?;
    let db = client.database(&config.database_name);

    let state = AppState::new(
        Repositories::mongo(&db),
        Arc::new(CredentialService::new(&config.jwt_secret)),
        Arc::new(LogMailer),
        Arc::new(DiskMediaStore::new(config.media_dir.clone(), config.media_base_url.clone())),
    );

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("oxcart listening on {}", config.bind_addr());
    axum::serve(listener, app).await?;
    Ok(())
}
