#![allow(dead_code)]

pub mod builders;
pub mod fixtures;
pub mod mocks;

use chrono::DateTime;
use cinebrowse::cache::{FileStorage, ManualClock, MemoryStorage, Namespace, TimeBoxedStateStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// State store over a temporary directory with a hand-driven clock.
pub struct TestContext {
    pub store: TimeBoxedStateStore,
    pub clock: ManualClock,
    _temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::open(temp_dir.path()).expect("Failed to open storage");
        let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let store = TimeBoxedStateStore::new(
            Arc::new(storage),
            Arc::new(clock.clone()),
            Namespace::PageState,
        );

        Self {
            store,
            clock,
            _temp_dir: temp_dir,
        }
    }

    /// A second store over the same directory, as a restarted process would
    /// open it.
    pub fn reopen(&self) -> TimeBoxedStateStore {
        let storage = FileStorage::open(self._temp_dir.path()).expect("Failed to open storage");
        TimeBoxedStateStore::new(
            Arc::new(storage),
            Arc::new(self.clock.clone()),
            Namespace::PageState,
        )
    }
}

pub fn memory_store() -> (TimeBoxedStateStore, Arc<MemoryStorage>, ManualClock) {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    let store = TimeBoxedStateStore::new(storage.clone(), Arc::new(clock.clone()), Namespace::PageState);
    (store, storage, clock)
}

/// Wait for an async condition to become true
pub async fn wait_for_async<F, Fut>(mut condition: F, max_wait: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = std::time::Instant::now();

    while start.elapsed() < max_wait {
        if condition().await {
            return true;
        }
        sleep(Duration::from_millis(5)).await;
    }

    false
}
