use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Property, PropertySubscriber};
use crate::backends::MetadataSource;
use crate::cache::{Namespace, TimeBoxedStateStore};
use crate::core::pagination::{
    DedupPaginator, PageSnapshot, PagedSource, PaginationState, PaginatorOptions,
};
use crate::core::visibility::BoundarySignals;
use crate::models::{Catalog, Identified, MediaSummary, PagedResult};
use crate::utils::{PaginationError, TransportError};

/// One catalog of a metadata source, seen as a sequence of pages.
#[derive(Debug, Clone)]
pub struct CatalogFeed {
    source: Arc<dyn MetadataSource>,
    catalog: Catalog,
}

impl CatalogFeed {
    pub fn new(source: Arc<dyn MetadataSource>, catalog: Catalog) -> Self {
        Self { source, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Paginator over this feed that only admits titles with a poster.
    pub fn paginator(self, options: PaginatorOptions) -> DedupPaginator<MediaSummary> {
        DedupPaginator::with_options(Arc::new(self), options).with_filter(MediaSummary::has_poster)
    }
}

#[async_trait]
impl PagedSource<MediaSummary> for CatalogFeed {
    async fn fetch_page(&self, page: u32) -> Result<PagedResult<MediaSummary>, TransportError> {
        self.source.fetch_paged(&self.catalog, page).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// Saved list state was still fresh; nothing was fetched.
    Restored,
    /// First page fetched from the source.
    Fetched,
}

/// A list page: paginator plus the saved state that outlives navigation.
#[derive(Debug)]
pub struct BrowseViewModel<T> {
    page_key: String,
    paginator: DedupPaginator<T>,
    store: TimeBoxedStateStore,
}

impl<T> BrowseViewModel<T>
where
    T: Identified + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        page_key: impl Into<String>,
        paginator: DedupPaginator<T>,
        store: &TimeBoxedStateStore,
    ) -> Self {
        Self {
            page_key: page_key.into(),
            paginator,
            store: store.in_namespace(Namespace::PageState),
        }
    }

    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    pub fn paginator(&self) -> &DedupPaginator<T> {
        &self.paginator
    }

    pub fn state(&self) -> PaginationState<T> {
        self.paginator.state()
    }

    pub fn property(&self) -> &Property<PaginationState<T>> {
        self.paginator.property()
    }

    pub fn subscribe(&self) -> PropertySubscriber<PaginationState<T>> {
        self.paginator.property().subscribe()
    }

    /// Rehydrate from saved state if it is still fresh, otherwise load the
    /// first page.
    pub async fn mount(&self) -> Result<MountOutcome, PaginationError> {
        if let Some(snapshot) = self.store.load::<PageSnapshot<T>>(&self.page_key) {
            info!(
                "Restoring {} from saved state ({} items)",
                self.page_key,
                snapshot.items.len()
            );
            self.paginator.restore(snapshot);
            return Ok(MountOutcome::Restored);
        }

        debug!("No saved state for {}, loading first page", self.page_key);
        self.paginator.load_initial().await?;
        self.persist();
        Ok(MountOutcome::Fetched)
    }

    /// Drop saved state and start over from the first page.
    pub async fn refresh(&self) -> Result<(), PaginationError> {
        self.store.remove(&self.page_key);
        self.paginator.reset();
        self.paginator.load_initial().await?;
        self.persist();
        Ok(())
    }

    /// Fetch the next page if the list allows it. Returns whether one was
    /// loaded.
    pub async fn load_more(&self) -> Result<bool, PaginationError> {
        let loaded = self.paginator.load_next().await?;
        if loaded {
            self.persist();
        }
        Ok(loaded)
    }

    /// The explicit "try again" action after an error.
    pub async fn retry(&self) -> Result<(), PaginationError> {
        self.paginator.retry().await?;
        self.persist();
        Ok(())
    }

    /// Follow a boundary sensor until it goes away or `cancel` fires. Signals
    /// that arrive while a page is loading are dropped; a load already under
    /// way is allowed to finish.
    pub async fn drive(&self, mut signals: BoundarySignals, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Stopped driving {}", self.page_key);
                    break;
                }
                signal = signals.next() => {
                    let Some(signal) = signal else {
                        debug!("Boundary sensor for {} closed", self.page_key);
                        break;
                    };
                    debug!("Boundary signal #{} on {}", signal.sequence, self.page_key);

                    if !self.load_while_ignoring(&mut signals).await {
                        debug!("Boundary sensor for {} closed", self.page_key);
                        break;
                    }
                }
            }
        }
    }

    /// Run one `load_more`, discarding signals received meanwhile. Returns
    /// `false` if the sensor closed during the load.
    async fn load_while_ignoring(&self, signals: &mut BoundarySignals) -> bool {
        let load = self.load_more();
        tokio::pin!(load);

        let mut open = true;
        loop {
            tokio::select! {
                biased;
                result = &mut load => {
                    if let Err(e) = result {
                        warn!("Loading more of {} failed: {}", self.page_key, e);
                    }
                    return open;
                }
                ignored = signals.next(), if open => match ignored {
                    Some(signal) => debug!(
                        "Ignoring boundary signal #{} on {} while loading",
                        signal.sequence, self.page_key
                    ),
                    None => open = false,
                },
            }
        }
    }

    /// Last-chance save when the view goes away.
    pub fn teardown(&self) {
        debug!("Tearing down {}", self.page_key);
        self.persist();
    }

    fn persist(&self) {
        let snapshot = self.paginator.property().with(|state| {
            // page stays at 1 until something has been committed
            (state.page() > 1).then(|| state.snapshot())
        });

        match snapshot {
            Some(snapshot) => self.store.save(&self.page_key, &snapshot),
            None => debug!("Nothing loaded on {} yet, not saving", self.page_key),
        }
    }
}
