// ─── Build Catalog ───
// Read-only client for the hosted build catalog: the list of downloadable
// versions and the chunked manifest describing each one. The chunk
// transfer itself goes through the asset store capability.

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};

const CATALOG_BASE: &str = "https://manifest.horizonfn.org";

/// One file of a manifest-based build, reassembled from numbered chunks.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkedFile {
    #[serde(rename = "ChunksIds")]
    pub chunk_ids: Vec<u32>,
    #[serde(rename = "File")]
    pub file: String,
    #[serde(rename = "FileSize")]
    pub file_size: u64,
}

/// Top-level manifest of one hosted build.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildManifest {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Chunks")]
    pub chunks: Vec<ChunkedFile>,
    #[serde(rename = "Size")]
    pub size: u64,
}

/// Extract the `major.minor` version from a catalog label such as
/// `Release-9.1-CL-6639283`, or from a bare `9.1`.
pub fn release_version(label: &str) -> Option<String> {
    let rest = label
        .split_once("Release-")
        .map(|(_, rest)| rest)
        .unwrap_or(label);

    let numeric: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = numeric.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
            Some(format!("{major}.{minor}"))
        }
        _ => None,
    }
}

pub struct BuildCatalog {
    client: Client,
    base_url: String,
}

impl BuildCatalog {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: CATALOG_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// All versions currently hosted on the catalog.
    pub async fn versions(&self) -> LauncherResult<Vec<String>> {
        let url = format!("{}/versions.json", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url,
                status: status.as_u16(),
            });
        }

        let versions: Vec<String> = response.json().await?;
        info!("Catalog lists {} hosted versions", versions.len());
        Ok(versions)
    }

    /// Fetch the chunk manifest for one hosted build.
    pub async fn manifest(&self, version_label: &str) -> LauncherResult<BuildManifest> {
        let version = release_version(version_label).ok_or_else(|| {
            LauncherError::Other(format!("version format is incorrect: {version_label}"))
        })?;

        let url = format!("{}/{}/{}.manifest", self.base_url, version, version);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
