mod auth;
mod config;
mod dataset;
mod decode;
mod errors;
mod models;
mod pipeline;
mod resumes;
mod routes;
mod state;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::SessionStore;
use crate::config::{require_env, Config, DatasetLocation, StorageConfig};
use crate::dataset::{DatasetSource, LocalCsvSource, S3CsvSource};
use crate::pipeline::{ClassifierAdapter, LinearTextModel, ResumeAssembler};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Load the classifier once; it is shared read-only by every request
    let model = LinearTextModel::load(&config.model_path).with_context(|| {
        format!(
            "Failed to load classifier from {}",
            config.model_path.display()
        )
    })?;
    let assembler = Arc::new(ResumeAssembler::new(ClassifierAdapter::new(Arc::new(model))));

    // Initialize the dataset source
    let dataset: Arc<dyn DatasetSource> = match &config.dataset {
        DatasetLocation::Local(path) => Arc::new(LocalCsvSource::new(path.clone())),
        DatasetLocation::S3 { bucket, key } => {
            let s3 = build_s3_client(&config.storage).await?;
            info!("S3 client initialized");
            Arc::new(S3CsvSource::new(s3, bucket.clone(), key.clone()))
        }
    };
    info!("Dataset source: {}", dataset.describe());

    let sessions = Arc::new(SessionStore::new(chrono::Duration::minutes(
        config.token_ttl_minutes,
    )));

    // Build app state
    let state = AppState {
        config: config.clone(),
        assembler,
        dataset,
        sessions,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict CORS to the dashboard origin
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (when `S3_ENDPOINT` is set) or AWS.
async fn build_s3_client(storage: &StorageConfig) -> Result<aws_sdk_s3::Client> {
    let credentials = Credentials::new(
        require_env("AWS_ACCESS_KEY_ID")?,
        require_env("AWS_SECRET_ACCESS_KEY")?,
        None,
        None,
        "resume-api-static",
    );

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(storage.region.clone()))
        .credentials_provider(credentials);
    if let Some(endpoint) = &storage.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let s3_config = loader.load().await;

    Ok(aws_sdk_s3::Client::new(&s3_config))
}
