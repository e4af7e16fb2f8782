mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::PgApplicationRepository;
use crate::config::{Config, StorageConfig};
use crate::db::{create_pool, run_migrations};
use crate::generation::synthesizer::SYNTHESIS_MODEL;
use crate::llm_client::LlmClient;
use crate::profile::PgProfileRepository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{DocumentStorage, LocalStorage, S3Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    if config.run_migrations {
        run_migrations(&db).await?;
    }

    // Initialize document storage
    let storage: Arc<dyn DocumentStorage> = match &config.storage {
        StorageConfig::S3 {
            bucket,
            endpoint,
            region,
            access_key_id,
            secret_access_key,
        } => {
            let s3 = build_s3_client(endpoint, region, access_key_id, secret_access_key).await;
            info!("S3 storage initialized (bucket: {bucket})");
            Arc::new(S3Storage::new(s3, bucket.clone()))
        }
        StorageConfig::Local { dir } => {
            info!("Local storage initialized at {}", dir.display());
            Arc::new(LocalStorage::new(dir.clone()))
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.llm_base_url,
        Duration::from_secs(config.llm_timeout_secs),
        config.llm_max_retries,
    )?;
    info!(
        "LLM client initialized (endpoint: {}, synthesis model: {}, retries: {})",
        config.llm_base_url, SYNTHESIS_MODEL, config.llm_max_retries
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        profiles: Arc::new(PgProfileRepository::new(db.clone())),
        applications: Arc::new(PgApplicationRepository::new(db)),
        storage,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(
    endpoint: &str,
    region: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "tailor-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials)
        .endpoint_url(endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
