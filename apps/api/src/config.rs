use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Base URL of the hosted inference endpoint.
    pub ai_endpoint: String,
    pub ai_api_key: String,
    /// Base URL of the platform auth service used for token introspection.
    pub auth_endpoint: String,
    /// Login URL unauthenticated callers are redirected to (with `?next=`).
    pub auth_login_url: String,
    /// Rasterizer binary for PDF previews.
    pub renderer_bin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            ai_endpoint: require_env("AI_ENDPOINT")?,
            ai_api_key: require_env("AI_API_KEY")?,
            auth_endpoint: require_env("AUTH_ENDPOINT")?,
            auth_login_url: std::env::var("AUTH_LOGIN_URL")
                .unwrap_or_else(|_| "/auth".to_string()),
            renderer_bin: std::env::var("RENDERER_BIN")
                .unwrap_or_else(|_| "pdftoppm".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
