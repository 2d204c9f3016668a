use async_trait::async_trait;

use crate::models::{Catalog, Genre, MediaDetails, MediaKind, MediaSummary, PagedResult, TmdbId};
use crate::utils::TransportError;

/// Remote catalog the browsing core reads from.
#[async_trait]
pub trait MetadataSource: Send + Sync + std::fmt::Debug {
    /// Fetch one page (1-based) of a listing.
    async fn fetch_paged(
        &self,
        catalog: &Catalog,
        page: u32,
    ) -> Result<PagedResult<MediaSummary>, TransportError>;

    /// Fetch the full record for one title, including its video list.
    async fn fetch_detail(&self, kind: MediaKind, id: TmdbId)
    -> Result<MediaDetails, TransportError>;

    async fn fetch_genres(&self, kind: MediaKind) -> Result<Vec<Genre>, TransportError>;

    /// Small fixed list of titles for the home carousel.
    async fn fetch_featured(&self) -> Result<Vec<MediaSummary>, TransportError> {
        let page = self.fetch_paged(&Catalog::NowPlaying, 1).await?;
        Ok(page.items)
    }
}
