// Shared catalogue stubs for service and endpoint tests

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use plugin_counter::catalogue_repo::{CatalogueFetcher, FetchError};

/// Returns a fixed count and tracks how often it was asked. A non-zero delay
/// widens the fetch window so lock contention is observable in tests.
pub struct StubCatalogue {
    pub count: u64,
    pub delay: Duration,
    calls: AtomicU64,
}

impl StubCatalogue {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            delay: Duration::ZERO,
            calls: AtomicU64::new(0),
        }
    }

    pub fn fetch_calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogueFetcher for StubCatalogue {
    async fn fetch(&self, _plugin_id: &str) -> Result<u64, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.count)
    }
}

/// Always fails as if the page had no recognizable count.
pub struct FailingCatalogue;

#[async_trait]
impl CatalogueFetcher for FailingCatalogue {
    async fn fetch(&self, _plugin_id: &str) -> Result<u64, FetchError> {
        Err(FetchError::Parse)
    }
}
