// Catalogue download counts over HTTP

pub mod parse;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::config::CatalogueConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalogue request timed out")]
    Timeout,
    #[error("catalogue request failed: {0}")]
    Http(reqwest::Error),
    #[error("catalogue returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("no download count found on the catalogue page")]
    Parse,
}

/// Remote source of authoritative download counts. Implementations may be
/// slow and may fail; callers treat every call as fallible.
#[async_trait]
pub trait CatalogueFetcher: Send + Sync {
    async fn fetch(&self, plugin_id: &str) -> Result<u64, FetchError>;
}

pub struct CatalogueRepo {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogueRepo {
    pub fn connect(config: &CatalogueConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl CatalogueFetcher for CatalogueRepo {
    async fn fetch(&self, plugin_id: &str) -> Result<u64, FetchError> {
        let url = format!("{}?id={}", self.base_url, plugin_id);
        debug!(plugin_id, url = %url, "requesting catalogue page");
        let response = self.client.get(&url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await.map_err(http_error)?;
        parse::extract_download_count(&body).ok_or(FetchError::Parse)
    }
}

fn http_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(e)
    }
}
