//! Deduplicating infinite-scroll pagination.
//!
//! [`PaginationState`] is a plain value with pure transition methods; each
//! takes the current state and returns the next one. [`DedupPaginator`] drives
//! those transitions against a [`PagedSource`] and publishes every state
//! through a [`Property`] so views can follow along.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::constants::MAX_CHAINED_SKIPS;
use crate::core::viewmodels::Property;
use crate::models::{Identified, PagedResult, TmdbId};
use crate::utils::{PaginationError, TransportError};

/// Something that can be asked for page `n` of a listing.
#[async_trait]
pub trait PagedSource<T>: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<PagedResult<T>, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorOptions {
    /// Consecutive empty pages to chain through before reporting an error.
    pub max_chained_skips: u32,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            max_chained_skips: MAX_CHAINED_SKIPS,
        }
    }
}

/// The persistable part of a [`PaginationState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState<T> {
    items: Vec<T>,
    seen_ids: HashSet<TmdbId>,
    page: u32,
    has_more: bool,
    loading_initial: bool,
    loading_more: bool,
    error: Option<PaginationError>,
}

impl<T> Default for PaginationState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen_ids: HashSet::new(),
            page: 1,
            has_more: true,
            loading_initial: false,
            loading_more: false,
            error: None,
        }
    }
}

impl<T: Identified + Clone> PaginationState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from a saved snapshot; seen ids come from the items.
    pub fn restored(snapshot: PageSnapshot<T>) -> Self {
        let mut seen_ids = HashSet::with_capacity(snapshot.items.len());
        let items = snapshot
            .items
            .into_iter()
            .filter(|item| seen_ids.insert(item.id()))
            .collect();

        Self {
            items,
            seen_ids,
            page: snapshot.page.max(1),
            has_more: snapshot.has_more,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> PageSnapshot<T> {
        PageSnapshot {
            items: self.items.clone(),
            page: self.page,
            has_more: self.has_more,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: TmdbId) -> bool {
        self.seen_ids.contains(&id)
    }

    /// Next page to request.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn loading_initial(&self) -> bool {
        self.loading_initial
    }

    pub fn loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading_initial || self.loading_more
    }

    pub fn error(&self) -> Option<&PaginationError> {
        self.error.as_ref()
    }

    /// Whether a boundary signal should advance to the next page.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.is_loading() && self.error.is_none()
    }

    /// A follow-up page fetch must not overlap one already in flight.
    /// Initial loads always proceed.
    pub fn can_begin(&self, is_initial: bool) -> bool {
        is_initial || !self.loading_more
    }

    pub fn begin(mut self, is_initial: bool) -> Self {
        if is_initial {
            self.loading_initial = true;
        } else {
            self.loading_more = true;
        }
        self
    }

    /// Items from `candidates` that would be new to this list. For an
    /// initial page everything previously seen is forgotten first.
    pub fn fresh_items(&self, candidates: Vec<T>, is_initial: bool) -> Vec<T> {
        let mut batch = HashSet::new();
        candidates
            .into_iter()
            .filter(|item| {
                let id = item.id();
                (is_initial || !self.seen_ids.contains(&id)) && batch.insert(id)
            })
            .collect()
    }

    /// Commit page `page_number`, whose new items are `fresh`.
    pub fn with_page(
        mut self,
        fresh: Vec<T>,
        page_number: u32,
        total_pages: u32,
        is_initial: bool,
    ) -> Self {
        if is_initial {
            self.items.clear();
            self.seen_ids.clear();
            self.page = page_number + 1;
        } else {
            self.page = self.page.max(page_number + 1);
        }

        self.seen_ids.extend(fresh.iter().map(Identified::id));
        self.items.extend(fresh);
        self.has_more = page_number < total_pages;
        self
    }

    pub fn finished(mut self) -> Self {
        self.loading_initial = false;
        self.loading_more = false;
        self.error = None;
        self
    }

    pub fn failed(mut self, error: PaginationError) -> Self {
        self.loading_initial = false;
        self.loading_more = false;
        self.error = Some(error);
        self
    }

    pub fn cleared_error(mut self) -> Self {
        self.error = None;
        self
    }
}

type Admissible<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Drives fetch-filter-dedup-append cycles for one list view.
pub struct DedupPaginator<T> {
    source: Arc<dyn PagedSource<T>>,
    admissible: Admissible<T>,
    options: PaginatorOptions,
    state: Property<PaginationState<T>>,
    generation: AtomicU64,
}

impl<T> std::fmt::Debug for DedupPaginator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupPaginator")
            .field("options", &self.options)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T> DedupPaginator<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn PagedSource<T>>) -> Self {
        Self::with_options(source, PaginatorOptions::default())
    }

    pub fn with_options(source: Arc<dyn PagedSource<T>>, options: PaginatorOptions) -> Self {
        Self {
            source,
            admissible: Arc::new(|_| true),
            options,
            state: Property::new(PaginationState::new(), "pagination_state"),
            generation: AtomicU64::new(0),
        }
    }

    /// Only items passing `predicate` are ever shown.
    pub fn with_filter(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.admissible = Arc::new(predicate);
        self
    }

    pub fn state(&self) -> PaginationState<T> {
        self.state.get()
    }

    pub fn property(&self) -> &Property<PaginationState<T>> {
        &self.state
    }

    /// Back to a freshly constructed state. Fetches still in flight are ignored
    /// when they land.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.set(PaginationState::new());
    }

    pub fn restore(&self, snapshot: PageSnapshot<T>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let restored = PaginationState::restored(snapshot);
        info!(
            "Restored {} items, next page {}",
            restored.len(),
            restored.page()
        );
        self.state.set(restored);
    }

    pub async fn load_initial(&self) -> Result<(), PaginationError> {
        self.load_page(1, true).await
    }

    /// Advance one page if the list has more, is idle and has no error.
    /// Returns whether a load was issued.
    pub async fn load_next(&self) -> Result<bool, PaginationError> {
        let next = self
            .state
            .with(|s| s.can_load_more().then_some(s.page()));
        match next {
            Some(page) => self.load_page(page, false).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Clear the error and re-issue the load that failed.
    pub async fn retry(&self) -> Result<(), PaginationError> {
        let (had_error, empty, page) = self
            .state
            .with(|s| (s.error().is_some(), s.is_empty(), s.page()));
        if !had_error {
            return Ok(());
        }

        self.state.update(|s| *s = std::mem::take(s).cleared_error());
        if empty {
            self.load_page(1, true).await
        } else {
            self.load_page(page, false).await
        }
    }

    pub async fn load_page(&self, page_number: u32, is_initial: bool) -> Result<(), PaginationError> {
        let begun = self.state.update_if(|s| {
            if !s.can_begin(is_initial) {
                return false;
            }
            *s = std::mem::take(s).begin(is_initial);
            true
        });
        if !begun {
            debug!("Page {} requested while another page is loading; ignoring", page_number);
            return Ok(());
        }

        let generation = if is_initial {
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.generation.load(Ordering::SeqCst)
        };

        let mut page = page_number;
        let mut initial = is_initial;
        let mut skips = 0u32;

        loop {
            debug!("Fetching page {} (initial: {})", page, initial);
            let result = self.source.fetch_page(page).await;

            if self.generation.load(Ordering::SeqCst) != generation {
                debug!("Dropping page {} result from a superseded load", page);
                return Ok(());
            }

            let PagedResult { items, total_pages } = match result {
                Ok(result) => result,
                Err(e) => {
                    warn!("Failed to load page {}: {}", page, e);
                    let error = PaginationError::from(e);
                    self.state
                        .update(|s| *s = std::mem::take(s).failed(error.clone()));
                    return Err(error);
                }
            };

            let candidates: Vec<T> = items.into_iter().filter(|i| (self.admissible)(i)).collect();

            let mut admitted = 0;
            self.state.update(|s| {
                let fresh = s.fresh_items(candidates, initial);
                admitted = fresh.len();
                *s = std::mem::take(s).with_page(fresh, page, total_pages, initial);
            });

            debug!("Page {} admitted {} new items", page, admitted);

            if admitted == 0 && page < total_pages {
                skips += 1;
                if skips > self.options.max_chained_skips {
                    let error = PaginationError::SkipLimitExceeded { page, skips: skips - 1 };
                    warn!("{}", error);
                    self.state
                        .update(|s| *s = std::mem::take(s).failed(error.clone()));
                    return Err(error);
                }
                debug!("Page {} had nothing new, continuing to page {}", page, page + 1);
                page += 1;
                initial = false;
                continue;
            }

            self.state.update(|s| *s = std::mem::take(s).finished());
            return Ok(());
        }
    }
}
