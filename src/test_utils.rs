//! Shared helpers for unit tests.

/// Common test utilities
pub mod common {
    use std::future::Future;
    use std::time::Duration;
    use tokio::time::sleep;

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
}

/// In-memory metadata source and record builders.
pub mod fixtures {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    use crate::backends::MetadataSource;
    use crate::models::{
        Catalog, Genre, MediaDetails, MediaKind, MediaSummary, PagedResult, TmdbId, Video,
    };
    use crate::utils::TransportError;

    pub fn summary(id: TmdbId) -> MediaSummary {
        MediaSummary {
            id,
            kind: MediaKind::Movie,
            title: format!("Movie {}", id),
            poster_path: Some(format!("/poster{}.jpg", id)),
            backdrop_path: Some(format!("/backdrop{}.jpg", id)),
            vote_average: 7.5,
            release_date: Some("2024-03-01".to_string()),
            overview: String::new(),
        }
    }

    pub fn summaries(ids: &[TmdbId]) -> Vec<MediaSummary> {
        ids.iter().copied().map(summary).collect()
    }

    pub fn details(id: TmdbId, with_trailer: bool) -> MediaDetails {
        let videos = if with_trailer {
            vec![Video {
                key: format!("trailer{}", id),
                site: "YouTube".to_string(),
                video_type: "Trailer".to_string(),
                name: "Official Trailer".to_string(),
            }]
        } else {
            Vec::new()
        };

        MediaDetails {
            summary: summary(id),
            genres: Vec::new(),
            tagline: None,
            status: Some("Released".to_string()),
            runtime: Some(120),
            number_of_seasons: None,
            videos,
            cast: Vec::new(),
        }
    }

    /// Pages per catalog; page `n` is `pages[n - 1]`, total pages is the
    /// number of pages given.
    #[derive(Debug, Default)]
    pub struct FakeSource {
        pages: Mutex<HashMap<Catalog, Vec<Vec<MediaSummary>>>>,
        details: Mutex<HashMap<TmdbId, MediaDetails>>,
        fail_pages: AtomicBool,
        page_gate: Mutex<Option<Arc<Notify>>>,
        page_requests: AtomicUsize,
        detail_requests: AtomicUsize,
    }

    impl FakeSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_pages(self, catalog: Catalog, pages: Vec<Vec<MediaSummary>>) -> Self {
            self.set_pages(catalog, pages);
            self
        }

        pub fn with_detail(self, detail: MediaDetails) -> Self {
            self.details
                .lock()
                .unwrap()
                .insert(detail.summary.id, detail);
            self
        }

        pub fn set_pages(&self, catalog: Catalog, pages: Vec<Vec<MediaSummary>>) {
            self.pages.lock().unwrap().insert(catalog, pages);
        }

        pub fn fail_pages(&self, fail: bool) {
            self.fail_pages.store(fail, Ordering::SeqCst);
        }

        /// Hold every page fetch until the returned gate is notified.
        pub fn gate_pages(&self) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            *self.page_gate.lock().unwrap() = Some(gate.clone());
            gate
        }

        pub fn open_pages(&self) {
            self.page_gate.lock().unwrap().take();
        }

        pub fn page_requests(&self) -> usize {
            self.page_requests.load(Ordering::SeqCst)
        }

        pub fn detail_requests(&self) -> usize {
            self.detail_requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        async fn fetch_paged(
            &self,
            catalog: &Catalog,
            page: u32,
        ) -> Result<PagedResult<MediaSummary>, TransportError> {
            self.page_requests.fetch_add(1, Ordering::SeqCst);
            let gate = self.page_gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if self.fail_pages.load(Ordering::SeqCst) {
                return Err(TransportError::Network("connection reset".to_string()));
            }

            let pages = self.pages.lock().unwrap();
            let listing = pages.get(catalog).cloned().unwrap_or_default();
            let items = listing
                .get(page.saturating_sub(1) as usize)
                .cloned()
                .unwrap_or_default();
            Ok(PagedResult::new(items, listing.len() as u32))
        }

        async fn fetch_detail(
            &self,
            kind: MediaKind,
            id: TmdbId,
        ) -> Result<MediaDetails, TransportError> {
            self.detail_requests.fetch_add(1, Ordering::SeqCst);
            self.details
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(TransportError::Status {
                    status: 404,
                    endpoint: format!("/{}/{}", kind.as_path(), id),
                })
        }

        async fn fetch_genres(&self, _kind: MediaKind) -> Result<Vec<Genre>, TransportError> {
            Ok(vec![Genre {
                id: 28,
                name: "Action".to_string(),
            }])
        }
    }
}
