use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::UpdateConfig;
use crate::error::{AppError, AppResult};
use crate::models::AppUpdate;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// HTTP side of the update flow: reads the release descriptor and fetches
/// packages.
#[derive(Clone)]
pub struct UpdateFeedClient {
    http: Client,
    descriptor_url: String,
}

impl UpdateFeedClient {
    pub fn new(cfg: &UpdateConfig) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("rifas-backend/update")
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            descriptor_url: cfg.descriptor_url.clone(),
        })
    }

    pub async fn fetch_descriptor(&self) -> AppResult<AppUpdate> {
        let resp = self.http.get(&self.descriptor_url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Update descriptor request failed: HTTP {}",
                status.as_u16()
            )));
        }

        let update: AppUpdate = resp.json().await?;
        Ok(update)
    }

    /// Streams the package at `url` into `dir/file_name` through a uniquely
    /// named `.part` file that is renamed once the body is complete.
    pub async fn download(&self, url: &str, dir: &Path, file_name: &str) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let partial = dir.join(format!("{}.part", Uuid::new_v4()));
        let target = dir.join(file_name);

        match self.write_body(url, &partial).await {
            Ok(bytes) => {
                tokio::fs::rename(&partial, &target).await?;
                log::info!("Downloaded {bytes} bytes from {url} to {}", target.display());
                Ok(target)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    log::debug!("No partial download to remove: {cleanup}");
                }
                Err(e)
            }
        }
    }

    async fn write_body(&self, url: &str, path: &Path) -> AppResult<u64> {
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Package download failed: HTTP {}",
                status.as_u16()
            )));
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;
        let mut body = resp.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}
