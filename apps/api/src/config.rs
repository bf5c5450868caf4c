use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub dataset: DatasetLocation,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub token_ttl_minutes: i64,
    pub default_parse_limit: i64,
    /// Service-layer cap on batch size; `None` leaves batches uncapped.
    pub max_parse_limit: Option<i64>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    Local(PathBuf),
    S3 { bucket: String, key: String },
}

impl DatasetLocation {
    /// `s3://bucket/key` selects object storage; anything else is a local path.
    pub fn parse(value: &str) -> Result<Self> {
        match value.strip_prefix("s3://") {
            Some(rest) => match rest.split_once('/') {
                Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                    Ok(DatasetLocation::S3 {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    })
                }
                _ => bail!("DATASET_PATH '{value}' must look like s3://bucket/key"),
            },
            None => Ok(DatasetLocation::Local(PathBuf::from(value))),
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Object storage settings, only consulted for `s3://` datasets.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_parse_limit = match std::env::var("MAX_PARSE_LIMIT") {
            Ok(v) => Some(
                v.parse::<i64>()
                    .context("MAX_PARSE_LIMIT must be an integer")?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            model_path: PathBuf::from(env_or("MODEL_PATH", "models/resume_classifier.json")),
            dataset: DatasetLocation::parse(&env_or(
                "DATASET_PATH",
                "data/UpdatedResumeDataSet.csv",
            ))?,
            auth: AuthConfig {
                email: require_env("AUTH_EMAIL")?,
                password: require_env("AUTH_PASSWORD")?,
            },
            storage: StorageConfig {
                endpoint: std::env::var("S3_ENDPOINT").ok(),
                region: env_or("AWS_REGION", "us-east-1"),
            },
            token_ttl_minutes: env_or("TOKEN_TTL_MINUTES", "60")
                .parse()
                .context("TOKEN_TTL_MINUTES must be an integer")?,
            default_parse_limit: env_or("DEFAULT_PARSE_LIMIT", "10")
                .parse()
                .context("DEFAULT_PARSE_LIMIT must be an integer")?,
            max_parse_limit,
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v.parse().context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

pub fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
