use async_trait::async_trait;
use cinebrowse::backends::MetadataSource;
use cinebrowse::models::{
    Catalog, Genre, MediaDetails, MediaKind, MediaSummary, PagedResult, TmdbId,
};
use cinebrowse::utils::TransportError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory metadata source. Pages are listed per catalog; total pages is
/// the number of pages given.
#[derive(Debug, Default)]
pub struct MockMetadataSource {
    pages: Mutex<HashMap<Catalog, Vec<Vec<MediaSummary>>>>,
    details: Mutex<HashMap<TmdbId, MediaDetails>>,
    detail_gates: Mutex<HashMap<TmdbId, Arc<Notify>>>,
    error_mode: Mutex<Option<TransportError>>,
    page_calls: Mutex<Vec<(Catalog, u32)>>,
    detail_calls: Mutex<Vec<TmdbId>>,
}

impl MockMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(self, catalog: Catalog, pages: Vec<Vec<MediaSummary>>) -> Self {
        self.pages.lock().unwrap().insert(catalog, pages);
        self
    }

    pub fn with_details(self, details: Vec<MediaDetails>) -> Self {
        {
            let mut map = self.details.lock().unwrap();
            for detail in details {
                map.insert(detail.summary.id, detail);
            }
        }
        self
    }

    /// Detail requests for `id` wait until the returned handle is notified.
    pub fn gate_detail(&self, id: TmdbId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.detail_gates.lock().unwrap().insert(id, gate.clone());
        gate
    }

    pub fn inject_error(&self, error: TransportError) {
        *self.error_mode.lock().unwrap() = Some(error);
    }

    pub fn clear_error(&self) {
        *self.error_mode.lock().unwrap() = None;
    }

    pub fn page_calls(&self) -> Vec<u32> {
        self.page_calls.lock().unwrap().iter().map(|(_, p)| *p).collect()
    }

    pub fn detail_calls(&self) -> Vec<TmdbId> {
        self.detail_calls.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<(), TransportError> {
        match self.error_mode.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataSource for MockMetadataSource {
    async fn fetch_paged(
        &self,
        catalog: &Catalog,
        page: u32,
    ) -> Result<PagedResult<MediaSummary>, TransportError> {
        self.page_calls.lock().unwrap().push((catalog.clone(), page));
        self.check_error()?;

        let listing = self
            .pages
            .lock()
            .unwrap()
            .get(catalog)
            .cloned()
            .unwrap_or_default();
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
        self.detail_calls.lock().unwrap().push(id);
        let gate = self.detail_gates.lock().unwrap().get(&id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check_error()?;

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

    async fn fetch_genres(&self, kind: MediaKind) -> Result<Vec<Genre>, TransportError> {
        self.check_error()?;
        Ok(match kind {
            MediaKind::Movie => vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
            ],
            MediaKind::Tv => vec![Genre {
                id: 10765,
                name: "Sci-Fi & Fantasy".to_string(),
            }],
        })
    }
}
