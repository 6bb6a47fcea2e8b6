use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{AssetStore, ProgressFn};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;

/// Interval between progress callbacks during a streaming fetch.
const PROGRESS_INTERVAL_MS: u128 = 100;

/// Production asset store: disk probes plus streaming HTTP fetches.
pub struct HttpAssetStore {
    client: Client,
}

impl HttpAssetStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_default_client() -> LauncherResult<Self> {
        Ok(Self::new(build_http_client()?))
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn exists(&self, path: &Path, expected_size: Option<u64>) -> bool {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => match expected_size {
                Some(size) => meta.len() == size,
                None => true,
            },
            _ => false,
        }
    }

    /// Stream a file to `dest`, reporting byte progress as it arrives.
    ///
    /// The written size is checked against the Content-Length afterwards;
    /// an empty or truncated file is treated as a failed fetch. Drops the
    /// file handle immediately after writing to avoid Windows OS Error 5.
    async fn fetch(&self, url: &str, dest: &Path, on_progress: &ProgressFn) -> LauncherResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        let mut last_update = Instant::now();

        {
            let mut file =
                tokio::fs::File::create(dest)
                    .await
                    .map_err(|e| LauncherError::Io {
                        path: dest.to_path_buf(),
                        source: e,
                    })?;

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await.map_err(|e| LauncherError::Io {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
                downloaded += chunk.len() as u64;

                if last_update.elapsed().as_millis() > PROGRESS_INTERVAL_MS {
                    on_progress(downloaded, total_bytes);
                    last_update = Instant::now();
                }
            }

            file.flush().await.map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
            // file is dropped here — critical on Windows
        }

        if downloaded == 0 {
            return Err(LauncherError::AssetIntegrity(format!(
                "downloaded file is empty: {url}"
            )));
        }

        if let Some(expected) = total_bytes {
            if downloaded != expected {
                return Err(LauncherError::AssetIntegrity(format!(
                    "downloaded {downloaded} bytes, expected {expected}: {url}"
                )));
            }
        }

        on_progress(downloaded, total_bytes);
        debug!("Fetched: {} -> {:?}", url, dest);
        Ok(())
    }

    async fn delete(&self, path: &Path) -> LauncherResult<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LauncherError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }
}
