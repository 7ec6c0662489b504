mod auth;
mod config;
mod errors;
mod inference;
mod models;
mod render;
mod routes;
mod state;
mod storage;
mod submission;

#[cfg(test)]
mod testutil;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::PlatformAuth;
use crate::config::Config;
use crate::inference::FeedbackClient;
use crate::render::PopplerRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::files::S3FileStore;
use crate::storage::kv::RedisKv;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumind API v{}", env!("CARGO_PKG_VERSION"));

    // Key-value store (Redis)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // File store (S3 / MinIO)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Hosted inference endpoint
    let ai = FeedbackClient::new(config.ai_endpoint.clone(), config.ai_api_key.clone());
    info!("Inference client initialized ({})", config.ai_endpoint);

    // PDF preview rasterizer and platform auth
    let renderer = PopplerRenderer::new(config.renderer_bin.clone());
    let auth = PlatformAuth::new(config.auth_endpoint.clone());

    // Build app state
    let state = AppState {
        files: Arc::new(S3FileStore::new(s3, config.s3_bucket.clone())),
        kv: Arc::new(RedisKv::new(redis)),
        ai: Arc::new(ai),
        renderer: Arc::new(renderer),
        auth: Arc::new(auth),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resumind-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
