use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, StatusCode};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

use crate::config::DeployConfig;
use crate::error::{KuduUpdateError, Result, UploadError};
use crate::target::DeploymentTarget;
use super::archive::ArchiveFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: u16,
    pub bytes_sent: u64,
}

#[async_trait]
pub trait ArchiveUploader: Send + Sync {
    async fn upload(&self, archive: &ArchiveFile, target: &DeploymentTarget) -> Result<UploadReceipt>;
}

/// Streams the archive to `<endpoint>/zip` with a Basic-authenticated PUT.
#[derive(Debug, Clone)]
pub struct HttpArchiveUploader {
    client: Client,
}

impl HttpArchiveUploader {
    pub fn new(config: &DeployConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(DeployConfig::user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| KuduUpdateError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArchiveUploader for HttpArchiveUploader {
    async fn upload(&self, archive: &ArchiveFile, target: &DeploymentTarget) -> Result<UploadReceipt> {
        let uri = target.upload_uri();
        let file = archive.open().await?;
        let length = file.metadata().await?.len();
        debug!(uri = %uri, bytes = length, "Starting archive upload");

        let response = self.client
            .put(&uri)
            .basic_auth(target.username(), Some(target.password()))
            .header(CONTENT_TYPE, "application/zip")
            .header(CONTENT_LENGTH, length)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, uri = %uri, "Upload transport error");
                UploadError::transport(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.ok();
            error!(status = status.as_u16(), "Upload rejected");
            return Err(UploadError::unexpected_status(status.as_u16(), body).into());
        }

        info!(bytes = length, "Archive uploaded");

        Ok(UploadReceipt {
            status: status.as_u16(),
            bytes_sent: length,
        })
    }
}
