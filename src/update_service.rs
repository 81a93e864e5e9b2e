// Request-triggered refresh pipeline: throttle gate, catalogue fetch, append.
// A per-plugin async lock spans the whole sequence, so concurrent updates for
// one plugin serialize and the loser sees the winner's last_fetched.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::catalogue_repo::{CatalogueFetcher, FetchError};
use crate::downloads_repo::{DownloadsRepo, StorageError};
use crate::models::Sample;
use crate::throttle;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("refresh throttled; last fetched at {last_fetched}")]
    Throttled { last_fetched: DateTime<Utc> },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct UpdateService {
    downloads_repo: Arc<DownloadsRepo>,
    catalogue: Arc<dyn CatalogueFetcher>,
    throttle_window: Duration,
    plugin_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UpdateService {
    pub fn new(
        downloads_repo: Arc<DownloadsRepo>,
        catalogue: Arc<dyn CatalogueFetcher>,
        throttle_hours: u32,
    ) -> Self {
        Self {
            downloads_repo,
            catalogue,
            throttle_window: Duration::hours(throttle_hours as i64),
            plugin_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Refreshes one plugin: throttle check, catalogue fetch, append. Nothing
    /// is written when the fetch fails, and a throttled request reports the
    /// stored last_fetched without touching the catalogue.
    pub async fn update(&self, plugin_id: &str) -> Result<Sample, UpdateError> {
        let lock = self.plugin_lock(plugin_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let last = self.downloads_repo.last_fetched(plugin_id).await?;
        if let Some(last_fetched) = last
            && !throttle::can_refresh(last, now, self.throttle_window)
        {
            return Err(UpdateError::Throttled { last_fetched });
        }

        info!(plugin_id, "fetching download count from catalogue");
        let count = self.catalogue.fetch(plugin_id).await?;
        let sample = self.downloads_repo.append(plugin_id, now, count).await?;
        info!(plugin_id, count, "download count updated");
        Ok(sample)
    }

    /// Lock handle for one plugin id; entries are created on first use and
    /// kept for the process lifetime (the id space is small).
    async fn plugin_lock(&self, plugin_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.plugin_locks.lock().await;
        locks
            .entry(plugin_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
