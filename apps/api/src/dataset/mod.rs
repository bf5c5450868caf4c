//! Dataset sources for batch parsing. A source only knows how to fetch the raw
//! CSV bytes; `loader::load_texts` turns them into documents.

pub mod loader;

use std::path::PathBuf;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub use loader::load_texts;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset schema error: {0}")]
    Schema(String),

    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset storage error: {0}")]
    Storage(String),
}

/// Where the tabular resume dataset lives. Each fetch re-reads the source.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Bytes, DatasetError>;
}

/// CSV file on the local filesystem.
pub struct LocalCsvSource {
    path: PathBuf,
}

impl LocalCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for LocalCsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Bytes, DatasetError> {
        let data = tokio::fs::read(&self.path).await?;
        debug!("Read {} bytes from {}", data.len(), self.path.display());
        Ok(Bytes::from(data))
    }
}

/// CSV object in S3 or MinIO.
pub struct S3CsvSource {
    client: aws_sdk_s3::Client,
    bucket: String,
    key: String,
}

impl S3CsvSource {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, key: String) -> Self {
        Self {
            client,
            bucket,
            key,
        }
    }
}

#[async_trait]
impl DatasetSource for S3CsvSource {
    fn describe(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }

    async fn fetch(&self) -> Result<Bytes, DatasetError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| {
                DatasetError::Storage(format!(
                    "get {}: {}",
                    self.describe(),
                    DisplayErrorContext(&e)
                ))
            })?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| DatasetError::Storage(format!("read {}: {e}", self.describe())))?
            .into_bytes();

        debug!("Fetched {} bytes from {}", data.len(), self.describe());
        Ok(data)
    }
}
